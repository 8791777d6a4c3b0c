//! Column names of the flattened table and the typed row → cell mapping.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{Balance, Row};

/// Every column a [`Row`] can populate, in overlay order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    AccountIban,
    AccountCurrency,
    AccountOwner,
    AccountServicerBic,
    StatementId,
    StatementDate,
    OpeningBalanceAmount,
    OpeningBalanceCurrency,
    OpeningBalanceCreditDebit,
    OpeningBalanceDate,
    ClosingBalanceAmount,
    ClosingBalanceCurrency,
    ClosingBalanceCreditDebit,
    ClosingBalanceDate,
    TransactionId,
    Amount,
    Currency,
    CreditDebit,
    Status,
    BookingDate,
    ValueDate,
    BankReference,
    TransactionType,
    TransactionFamily,
    TransactionSubfamily,
    TransactionReference,
    InstructedAmount,
    TransactionAmount,
    SourceCurrency,
    TargetCurrency,
    ExchangeRate,
    DebtorName,
    DebtorAddress,
    CreditorName,
    DebtorBankBic,
    DebtorBankName,
    DebtorBankCountry,
    Description,
    SourceFile,
    IsInvoicePayment,
    InvoiceNumber,
    Note,
    Comment,
}

impl Column {
    /// All columns in the order a row overlays them.
    pub const ALL: [Column; 43] = [
        Self::AccountIban,
        Self::AccountCurrency,
        Self::AccountOwner,
        Self::AccountServicerBic,
        Self::StatementId,
        Self::StatementDate,
        Self::OpeningBalanceAmount,
        Self::OpeningBalanceCurrency,
        Self::OpeningBalanceCreditDebit,
        Self::OpeningBalanceDate,
        Self::ClosingBalanceAmount,
        Self::ClosingBalanceCurrency,
        Self::ClosingBalanceCreditDebit,
        Self::ClosingBalanceDate,
        Self::TransactionId,
        Self::Amount,
        Self::Currency,
        Self::CreditDebit,
        Self::Status,
        Self::BookingDate,
        Self::ValueDate,
        Self::BankReference,
        Self::TransactionType,
        Self::TransactionFamily,
        Self::TransactionSubfamily,
        Self::TransactionReference,
        Self::InstructedAmount,
        Self::TransactionAmount,
        Self::SourceCurrency,
        Self::TargetCurrency,
        Self::ExchangeRate,
        Self::DebtorName,
        Self::DebtorAddress,
        Self::CreditorName,
        Self::DebtorBankBic,
        Self::DebtorBankName,
        Self::DebtorBankCountry,
        Self::Description,
        Self::SourceFile,
        Self::IsInvoicePayment,
        Self::InvoiceNumber,
        Self::Note,
        Self::Comment,
    ];

    /// Header name as written to the output table.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AccountIban => "account_iban",
            Self::AccountCurrency => "account_currency",
            Self::AccountOwner => "account_owner",
            Self::AccountServicerBic => "account_servicer_bic",
            Self::StatementId => "statement_id",
            Self::StatementDate => "statement_date",
            Self::OpeningBalanceAmount => "opening_balance_amount",
            Self::OpeningBalanceCurrency => "opening_balance_currency",
            Self::OpeningBalanceCreditDebit => "opening_balance_credit_debit",
            Self::OpeningBalanceDate => "opening_balance_date",
            Self::ClosingBalanceAmount => "closing_balance_amount",
            Self::ClosingBalanceCurrency => "closing_balance_currency",
            Self::ClosingBalanceCreditDebit => "closing_balance_credit_debit",
            Self::ClosingBalanceDate => "closing_balance_date",
            Self::TransactionId => "transaction_id",
            Self::Amount => "amount",
            Self::Currency => "currency",
            Self::CreditDebit => "credit_debit",
            Self::Status => "status",
            Self::BookingDate => "booking_date",
            Self::ValueDate => "value_date",
            Self::BankReference => "bank_reference",
            Self::TransactionType => "transaction_type",
            Self::TransactionFamily => "transaction_family",
            Self::TransactionSubfamily => "transaction_subfamily",
            Self::TransactionReference => "transaction_reference",
            Self::InstructedAmount => "instructed_amount",
            Self::TransactionAmount => "transaction_amount",
            Self::SourceCurrency => "source_currency",
            Self::TargetCurrency => "target_currency",
            Self::ExchangeRate => "exchange_rate",
            Self::DebtorName => "debtor_name",
            Self::DebtorAddress => "debtor_address",
            Self::CreditorName => "creditor_name",
            Self::DebtorBankBic => "debtor_bank_bic",
            Self::DebtorBankName => "debtor_bank_name",
            Self::DebtorBankCountry => "debtor_bank_country",
            Self::Description => "description",
            Self::SourceFile => "source_file",
            Self::IsInvoicePayment => "is_invoice_payment",
            Self::InvoiceNumber => "Inv.no.",
            Self::Note => "Note",
            Self::Comment => "Comment",
        }
    }

    /// Look up a column by its header name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single populated table value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Text(String),
    Number(Decimal),
    Flag(bool),
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(d) => write!(f, "{d}"),
            Self::Flag(true) => f.write_str("True"),
            Self::Flag(false) => f.write_str("False"),
        }
    }
}

fn text(value: &Option<String>) -> Option<Cell> {
    value.as_ref().map(|s| Cell::Text(s.clone()))
}

fn number(value: Option<Decimal>) -> Option<Cell> {
    value.map(Cell::Number)
}

#[derive(Clone, Copy)]
enum BalancePart {
    Amount,
    Currency,
    CreditDebit,
    Date,
}

fn balance_cell(balance: Option<&Balance>, part: BalancePart) -> Option<Cell> {
    let b = balance?;
    match part {
        BalancePart::Amount => Some(Cell::Number(b.amount)),
        BalancePart::Currency => Some(Cell::Text(b.currency.clone())),
        BalancePart::CreditDebit => Some(Cell::Text(b.credit_debit.code().to_string())),
        BalancePart::Date => b.date.as_ref().map(|d| Cell::Text(d.clone())),
    }
}

impl Row {
    /// Value of one column, `None` when the row does not carry it.
    pub fn cell(&self, column: Column) -> Option<Cell> {
        let detail = self.detail.as_ref();
        let exchange = detail.and_then(|d| d.exchange.as_ref());
        let class = self.classification.as_ref();
        match column {
            Column::AccountIban => text(&self.account.iban),
            Column::AccountCurrency => text(&self.account.currency),
            Column::AccountOwner => text(&self.account.owner),
            Column::AccountServicerBic => text(&self.account.servicer_bic),
            Column::StatementId => text(&self.statement.id),
            Column::StatementDate => text(&self.statement.creation_timestamp),
            Column::OpeningBalanceAmount => {
                balance_cell(self.opening_balance.as_ref(), BalancePart::Amount)
            }
            Column::OpeningBalanceCurrency => {
                balance_cell(self.opening_balance.as_ref(), BalancePart::Currency)
            }
            Column::OpeningBalanceCreditDebit => {
                balance_cell(self.opening_balance.as_ref(), BalancePart::CreditDebit)
            }
            Column::OpeningBalanceDate => {
                balance_cell(self.opening_balance.as_ref(), BalancePart::Date)
            }
            Column::ClosingBalanceAmount => {
                balance_cell(self.closing_balance.as_ref(), BalancePart::Amount)
            }
            Column::ClosingBalanceCurrency => {
                balance_cell(self.closing_balance.as_ref(), BalancePart::Currency)
            }
            Column::ClosingBalanceCreditDebit => {
                balance_cell(self.closing_balance.as_ref(), BalancePart::CreditDebit)
            }
            Column::ClosingBalanceDate => {
                balance_cell(self.closing_balance.as_ref(), BalancePart::Date)
            }
            Column::TransactionId => text(&self.entry.transaction_id),
            Column::Amount => number(self.entry.amount),
            Column::Currency => text(&self.entry.currency),
            Column::CreditDebit => self
                .entry
                .credit_debit
                .map(|cd| Cell::Text(cd.code().to_string())),
            Column::Status => text(&self.entry.status),
            Column::BookingDate => text(&self.entry.booking_date),
            Column::ValueDate => text(&self.entry.value_date),
            Column::BankReference => text(&self.entry.bank_reference),
            Column::TransactionType => text(&self.entry.transaction_type),
            Column::TransactionFamily => text(&self.entry.transaction_family),
            Column::TransactionSubfamily => text(&self.entry.transaction_subfamily),
            Column::TransactionReference => detail.and_then(|d| text(&d.transaction_reference)),
            Column::InstructedAmount => detail.and_then(|d| number(d.instructed_amount)),
            Column::TransactionAmount => detail.and_then(|d| number(d.transaction_amount)),
            Column::SourceCurrency => exchange.map(|x| Cell::Text(x.source_currency.clone())),
            Column::TargetCurrency => exchange.map(|x| Cell::Text(x.target_currency.clone())),
            Column::ExchangeRate => exchange.and_then(|x| number(x.rate)),
            Column::DebtorName => detail.and_then(|d| text(&d.debtor_name)),
            Column::DebtorAddress => detail.and_then(|d| text(&d.debtor_address)),
            Column::CreditorName => detail.and_then(|d| text(&d.creditor_name)),
            Column::DebtorBankBic => detail.and_then(|d| text(&d.debtor_bank_bic)),
            Column::DebtorBankName => detail.and_then(|d| text(&d.debtor_bank_name)),
            Column::DebtorBankCountry => detail.and_then(|d| text(&d.debtor_bank_country)),
            Column::Description => detail.and_then(|d| text(&d.description)),
            Column::SourceFile => Some(Cell::Text(self.source_file.clone())),
            Column::IsInvoicePayment => class.map(|c| Cell::Flag(c.is_invoice_payment)),
            Column::InvoiceNumber => class.map(|c| Cell::Text(c.invoice_number.clone())),
            Column::Note => class.map(|c| Cell::Text(c.note.clone())),
            Column::Comment => class.map(|c| Cell::Text(c.comment.clone())),
        }
    }

    /// All populated columns of the row, in overlay order.
    pub fn cells(&self) -> Vec<(Column, Cell)> {
        Column::ALL
            .iter()
            .filter_map(|&c| self.cell(c).map(|v| (c, v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CreditDebit, Entry, TransactionDetail};

    fn bare_row() -> Row {
        Row {
            account: Default::default(),
            statement: Default::default(),
            opening_balance: None,
            closing_balance: None,
            entry: Entry::default(),
            detail: None,
            source_file: "a.xml".into(),
            classification: None,
        }
    }

    #[test]
    fn names_round_trip() {
        for c in Column::ALL {
            assert_eq!(Column::from_name(c.name()), Some(c));
        }
        assert_eq!(Column::from_name("nope"), None);
    }

    #[test]
    fn bare_row_only_has_source_file() {
        let cells = bare_row().cells();
        assert_eq!(cells, vec![(Column::SourceFile, Cell::Text("a.xml".into()))]);
    }

    #[test]
    fn detail_columns_follow_entry_columns() {
        let mut row = bare_row();
        row.entry.credit_debit = Some(CreditDebit::Debit);
        row.detail = Some(TransactionDetail {
            debtor_name: Some("ACME".into()),
            ..Default::default()
        });
        let cols: Vec<Column> = row.cells().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            cols,
            vec![Column::CreditDebit, Column::DebtorName, Column::SourceFile]
        );
        assert_eq!(
            row.cell(Column::CreditDebit),
            Some(Cell::Text("DBIT".into()))
        );
    }

    #[test]
    fn balances_fill_their_own_columns() {
        let mut row = bare_row();
        row.opening_balance = Some(Balance {
            amount: rust_decimal_macros::dec!(1500.00),
            currency: "EUR".into(),
            credit_debit: CreditDebit::Credit,
            date: Some("2024-03-01".into()),
        });
        row.closing_balance = Some(Balance {
            amount: rust_decimal_macros::dec!(-20.5),
            currency: "CHF".into(),
            credit_debit: CreditDebit::Debit,
            date: None,
        });

        let opening: Vec<Option<Cell>> = [
            Column::OpeningBalanceAmount,
            Column::OpeningBalanceCurrency,
            Column::OpeningBalanceCreditDebit,
            Column::OpeningBalanceDate,
        ]
        .into_iter()
        .map(|c| row.cell(c))
        .collect();
        assert_eq!(
            opening,
            [
                Some(Cell::Number(rust_decimal_macros::dec!(1500.00))),
                Some(Cell::Text("EUR".into())),
                Some(Cell::Text("CRDT".into())),
                Some(Cell::Text("2024-03-01".into())),
            ]
        );

        let closing: Vec<Option<Cell>> = [
            Column::ClosingBalanceAmount,
            Column::ClosingBalanceCurrency,
            Column::ClosingBalanceCreditDebit,
            Column::ClosingBalanceDate,
        ]
        .into_iter()
        .map(|c| row.cell(c))
        .collect();
        assert_eq!(
            closing,
            [
                Some(Cell::Number(rust_decimal_macros::dec!(-20.5))),
                Some(Cell::Text("CHF".into())),
                Some(Cell::Text("DBIT".into())),
                None,
            ]
        );
    }

    #[test]
    fn flag_display_matches_table_output() {
        assert_eq!(Cell::Flag(true).to_string(), "True");
        assert_eq!(Cell::Flag(false).to_string(), "False");
    }
}
