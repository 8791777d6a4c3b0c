use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency assumed when an amount element carries no `Ccy` attribute.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// `Acct`: the statement's account, attached to every row of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// `Acct/Id/IBAN`.
    pub iban: Option<String>,
    /// `Acct/Ccy`.
    pub currency: Option<String>,
    /// `Acct/Ownr/Nm`.
    pub owner: Option<String>,
    /// `Acct/Svcr/FinInstnId/BIC` (or `BICFI`).
    pub servicer_bic: Option<String>,
}

/// `Stmt`: statement identification, static per document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementInfo {
    /// `Stmt/Id`.
    pub id: Option<String>,
    /// `Stmt/CreDtTm`, passed through as written.
    pub creation_timestamp: Option<String>,
}

/// `CdtDbtInd`: direction of a booking or balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditDebit {
    /// `CRDT`
    #[serde(rename = "CRDT")]
    Credit,
    /// `DBIT`
    #[serde(rename = "DBIT")]
    Debit,
}

impl CreditDebit {
    /// The ISO 20022 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Credit => "CRDT",
            Self::Debit => "DBIT",
        }
    }

    /// Parse an ISO 20022 indicator code (ASCII case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        if code.eq_ignore_ascii_case("CRDT") {
            Some(Self::Credit)
        } else if code.eq_ignore_ascii_case("DBIT") {
            Some(Self::Debit)
        } else {
            None
        }
    }
}

/// `Bal/Tp/CdOrPrtry/Cd` codes the extractor keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalanceType {
    /// `OPBD`: opening booked balance.
    Opening,
    /// `CLBD`: closing booked balance.
    Closing,
}

impl BalanceType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Opening => "OPBD",
            Self::Closing => "CLBD",
        }
    }

    /// Any other balance code (`PRCD`, `ITBD`, ...) yields `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "OPBD" => Some(Self::Opening),
            "CLBD" => Some(Self::Closing),
            _ => None,
        }
    }
}

/// `Bal`: an opening or closing balance of the statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// `Bal/Amt`.
    pub amount: Decimal,
    /// `Bal/Amt/@Ccy`, `"EUR"` when the attribute is missing.
    pub currency: String,
    /// `Bal/CdtDbtInd`.
    pub credit_debit: CreditDebit,
    /// `Bal/Dt/Dt` (or `Bal/Dt/DtTm`).
    pub date: Option<String>,
}

/// `Ntry`: one statement line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// `NtryRef`.
    pub transaction_id: Option<String>,
    /// `Amt`.
    pub amount: Option<Decimal>,
    /// `Amt/@Ccy`; only set together with `amount`.
    pub currency: Option<String>,
    /// `CdtDbtInd`.
    pub credit_debit: Option<CreditDebit>,
    /// `Sts` (or `Sts/Cd`).
    pub status: Option<String>,
    /// `BookgDt/Dt` (or `BookgDt/DtTm`).
    pub booking_date: Option<String>,
    /// `ValDt/Dt` (or `ValDt/DtTm`).
    pub value_date: Option<String>,
    /// `AcctSvcrRef`.
    pub bank_reference: Option<String>,
    /// `BkTxCd/Domn/Cd`.
    pub transaction_type: Option<String>,
    /// `BkTxCd/Domn/Fmly/Cd`.
    pub transaction_family: Option<String>,
    /// `BkTxCd/Domn/Fmly/SubFmlyCd`.
    pub transaction_subfamily: Option<String>,
}

/// `AmtDtls/TxAmt/CcyXchg`: only recorded when both currency legs exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyExchange {
    /// `SrcCcy`.
    pub source_currency: String,
    /// `TrgtCcy`.
    pub target_currency: String,
    /// `XchgRate`.
    pub rate: Option<Decimal>,
}

/// `TxDtls`: counterparty and settlement detail below an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetail {
    /// `Refs/AcctSvcrRef`.
    pub transaction_reference: Option<String>,
    /// `AmtDtls/InstdAmt/Amt`.
    pub instructed_amount: Option<Decimal>,
    /// `AmtDtls/TxAmt/Amt`.
    pub transaction_amount: Option<Decimal>,
    /// `AmtDtls/TxAmt/CcyXchg`.
    pub exchange: Option<CurrencyExchange>,
    /// `RltdPties/Dbtr/Nm`.
    pub debtor_name: Option<String>,
    /// First `RltdPties/Dbtr/PstlAdr/AdrLine`.
    pub debtor_address: Option<String>,
    /// `RltdPties/Cdtr/Nm`.
    pub creditor_name: Option<String>,
    /// `RltdAgts/DbtrAgt/FinInstnId/BIC` (or `BICFI`).
    pub debtor_bank_bic: Option<String>,
    /// `RltdAgts/DbtrAgt/FinInstnId/Nm`.
    pub debtor_bank_name: Option<String>,
    /// `RltdAgts/DbtrAgt/FinInstnId/PstlAdr/Ctry`.
    pub debtor_bank_country: Option<String>,
    /// Every non-empty `Ustrd` fragment joined with `" | "`.
    pub description: Option<String>,
}

/// Derived reconciliation columns, set after all documents are merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub is_invoice_payment: bool,
    /// `Inv.no.`: empty when no invoice number was found.
    pub invoice_number: String,
    /// `Note`.
    pub note: String,
    /// `Comment`: left empty for manual annotation.
    pub comment: String,
}

/// One flattened output row: document context, entry, optional detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub account: AccountInfo,
    pub statement: StatementInfo,
    pub opening_balance: Option<Balance>,
    pub closing_balance: Option<Balance>,
    pub entry: Entry,
    /// `None` for an entry without any `TxDtls`.
    pub detail: Option<TransactionDetail>,
    /// Basename of the originating document.
    pub source_file: String,
    pub classification: Option<Classification>,
}

impl Row {
    pub fn credit_debit(&self) -> Option<CreditDebit> {
        self.entry.credit_debit
    }

    pub fn debtor_name(&self) -> Option<&str> {
        self.detail.as_ref()?.debtor_name.as_deref()
    }

    pub fn debtor_address(&self) -> Option<&str> {
        self.detail.as_ref()?.debtor_address.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.detail.as_ref()?.description.as_deref()
    }
}
