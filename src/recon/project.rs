//! Flattened table and column selection/ordering.

use serde::{Deserialize, Serialize};

use crate::core::{Cell, Column, Row};

/// Which conversion the caller runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    /// Classification, invoice-number extraction and reconciliation column order.
    #[default]
    Full,
    /// Extraction only, in converter column order.
    Raw,
}

/// Reconciliation order: dates and identifiers, amounts and flow,
/// counterparties, bank detail, account detail, balances, enrichment.
const FULL_ORDER: &[Column] = &[
    Column::BookingDate,
    Column::ValueDate,
    Column::TransactionId,
    Column::BankReference,
    Column::TransactionReference,
    Column::Amount,
    Column::Currency,
    Column::CreditDebit,
    Column::InstructedAmount,
    Column::TransactionAmount,
    Column::SourceCurrency,
    Column::TargetCurrency,
    Column::ExchangeRate,
    Column::DebtorName,
    Column::DebtorAddress,
    Column::CreditorName,
    Column::Description,
    Column::DebtorBankBic,
    Column::DebtorBankName,
    Column::DebtorBankCountry,
    Column::AccountIban,
    Column::AccountCurrency,
    Column::AccountOwner,
    Column::AccountServicerBic,
    Column::OpeningBalanceAmount,
    Column::OpeningBalanceCurrency,
    Column::OpeningBalanceCreditDebit,
    Column::OpeningBalanceDate,
    Column::ClosingBalanceAmount,
    Column::ClosingBalanceCurrency,
    Column::ClosingBalanceCreditDebit,
    Column::ClosingBalanceDate,
    Column::IsInvoicePayment,
    Column::InvoiceNumber,
    Column::Note,
    Column::Comment,
];

/// Converter order: account, statement, balances, entry, detail, source file.
const RAW_ORDER: &[Column] = &[
    Column::AccountIban,
    Column::AccountCurrency,
    Column::AccountOwner,
    Column::AccountServicerBic,
    Column::StatementId,
    Column::StatementDate,
    Column::OpeningBalanceAmount,
    Column::OpeningBalanceCurrency,
    Column::OpeningBalanceCreditDebit,
    Column::OpeningBalanceDate,
    Column::ClosingBalanceAmount,
    Column::ClosingBalanceCurrency,
    Column::ClosingBalanceCreditDebit,
    Column::ClosingBalanceDate,
    Column::TransactionId,
    Column::BookingDate,
    Column::ValueDate,
    Column::Amount,
    Column::Currency,
    Column::CreditDebit,
    Column::Status,
    Column::BankReference,
    Column::TransactionType,
    Column::TransactionFamily,
    Column::TransactionSubfamily,
    Column::TransactionReference,
    Column::InstructedAmount,
    Column::TransactionAmount,
    Column::SourceCurrency,
    Column::TargetCurrency,
    Column::ExchangeRate,
    Column::DebtorName,
    Column::DebtorAddress,
    Column::CreditorName,
    Column::DebtorBankBic,
    Column::DebtorBankName,
    Column::DebtorBankCountry,
    Column::Description,
    Column::SourceFile,
];

impl ProjectionMode {
    /// Preferred column order of this mode.
    pub fn preferred_columns(&self) -> &'static [Column] {
        match self {
            Self::Full => FULL_ORDER,
            Self::Raw => RAW_ORDER,
        }
    }

    pub fn classifies(&self) -> bool {
        matches!(self, Self::Full)
    }
}

/// A rectangular table with an open column set; absent values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<Cell>>>,
}

impl Table {
    /// Build a table whose columns are the first-seen union of the rows' populated columns.
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut present: Vec<Column> = Vec::new();
        let cells: Vec<Vec<(Column, Cell)>> = rows.iter().map(Row::cells).collect();
        for row in &cells {
            for (col, _) in row {
                if !present.contains(col) {
                    present.push(*col);
                }
            }
        }

        let values = cells
            .into_iter()
            .map(|row| {
                let mut out: Vec<Option<Cell>> = vec![None; present.len()];
                for (col, cell) in row {
                    if let Some(idx) = present.iter().position(|c| *c == col) {
                        out[idx] = Some(cell);
                    }
                }
                out
            })
            .collect();

        Self {
            columns: present.iter().map(|c| c.name().to_string()).collect(),
            rows: values,
        }
    }

    /// Build a table from explicit columns and rows; short rows are padded.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Option<Cell>>>) -> Self {
        for row in &mut rows {
            row.resize(columns.len(), None);
        }
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<Cell>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value of column `name` in row `row`.
    pub fn value(&self, row: usize, name: &str) -> Option<&Cell> {
        let idx = self.column_index(name)?;
        self.rows.get(row)?.get(idx)?.as_ref()
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Vec<Option<&Cell>> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().map(|r| r[idx].as_ref()).collect(),
            None => Vec::new(),
        }
    }
}

/// Selects and orders table columns by a preferred list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProjector {
    preferred: Vec<String>,
}

impl ColumnProjector {
    pub fn new(mode: ProjectionMode) -> Self {
        Self {
            preferred: mode
                .preferred_columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
        }
    }

    /// Projector with a caller-supplied preferred order.
    pub fn with_preferred<I, S>(preferred: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            preferred: preferred.into_iter().map(Into::into).collect(),
        }
    }

    pub fn preferred(&self) -> &[String] {
        &self.preferred
    }

    /// Preferred columns that occur in `table`, then every other column in
    /// its original (first-seen) position order.
    pub fn project(&self, table: &Table) -> Table {
        let mut order: Vec<usize> = Vec::with_capacity(table.columns.len());
        for name in &self.preferred {
            if let Some(idx) = table.column_index(name) {
                if !order.contains(&idx) {
                    order.push(idx);
                }
            }
        }
        for idx in 0..table.columns.len() {
            if !order.contains(&idx) {
                order.push(idx);
            }
        }

        Table {
            columns: order.iter().map(|&i| table.columns[i].clone()).collect(),
            rows: table
                .rows
                .iter()
                .map(|row| order.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Option<Cell> {
        Some(Cell::Text(s.into()))
    }

    #[test]
    fn preferred_first_then_first_seen() {
        let table = Table::new(
            vec!["zeta".into(), "amount".into(), "alpha".into(), "booking_date".into()],
            vec![vec![text("z"), text("1"), text("a"), text("2024-01-01")]],
        );
        let projected = ColumnProjector::new(ProjectionMode::Full).project(&table);
        assert_eq!(projected.columns(), ["booking_date", "amount", "zeta", "alpha"]);
        assert_eq!(projected.value(0, "alpha"), Some(&Cell::Text("a".into())));
    }

    #[test]
    fn preferred_columns_absent_from_data_are_not_added() {
        let table = Table::new(vec!["amount".into()], vec![vec![None]]);
        let projected =
            ColumnProjector::with_preferred(["Note", "amount", "amount"]).project(&table);
        assert_eq!(projected.columns(), ["amount"]);
    }

    #[test]
    fn new_pads_short_rows() {
        let table = Table::new(vec!["a".into(), "b".into()], vec![vec![text("x")]]);
        assert_eq!(table.rows()[0], vec![text("x"), None]);
    }

    #[test]
    fn every_column_has_a_place_in_raw_order() {
        for col in Column::ALL {
            let enrichment = matches!(
                col,
                Column::IsInvoicePayment | Column::InvoiceNumber | Column::Note | Column::Comment
            );
            assert_eq!(RAW_ORDER.contains(&col), !enrichment, "{col}");
        }
    }
}
