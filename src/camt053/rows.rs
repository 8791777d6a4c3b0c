//! Fan-out of one `Ntry` into flattened rows.

use super::fields;
use super::tree::{Document, Element};
use crate::core::{AccountInfo, Balance, CamtError, Entry, Row, StatementInfo};

/// Document-level values shared by every row of one statement file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementContext {
    pub account: AccountInfo,
    pub statement: StatementInfo,
    pub opening_balance: Option<Balance>,
    pub closing_balance: Option<Balance>,
    /// Basename of the originating file.
    pub source_file: String,
}

impl StatementContext {
    fn row(&self, entry: &Entry) -> Row {
        Row {
            account: self.account.clone(),
            statement: self.statement.clone(),
            opening_balance: self.opening_balance.clone(),
            closing_balance: self.closing_balance.clone(),
            entry: entry.clone(),
            detail: None,
            source_file: self.source_file.clone(),
            classification: None,
        }
    }
}

/// Build the rows for one entry: one per `TxDtls`, or a single row without
/// detail when the entry has none.
pub fn build_rows(
    doc: &Document,
    ctx: &StatementContext,
    ntry: &Element,
) -> Result<Vec<Row>, CamtError> {
    let entry = fields::entry(doc, ntry)?;
    let details = doc.find_descendants(ntry, "TxDtls");

    if details.is_empty() {
        return Ok(vec![ctx.row(&entry)]);
    }

    details
        .into_iter()
        .map(|tx| {
            let mut row = ctx.row(&entry);
            row.detail = Some(fields::transaction_detail(doc, tx)?);
            Ok(row)
        })
        .collect()
}
