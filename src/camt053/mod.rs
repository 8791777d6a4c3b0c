//! CAMT.053 statement extraction.
//!
//! Parses an ISO 20022 `BkToCstmrStmt` document and flattens it into
//! [`Row`]s: one row per transaction detail (`TxDtls`), or one row for an
//! entry (`Ntry`) that carries none. Account, statement and balance values are
//! repeated on every row of the document.
//!
//! The namespace is read from the root element, so any `camt.053.001.xx`
//! version is accepted; no schema validation is performed.
//!
//! # Example
//!
//! ```
//! use camt_recon::camt053;
//!
//! let xml = r#"<Document xmlns="urn:iso:std:iso:20022:tech:xsd:camt.053.001.02">
//!   <BkToCstmrStmt><Stmt><Id>S1</Id>
//!     <Ntry><Amt>10.00</Amt><CdtDbtInd>CRDT</CdtDbtInd></Ntry>
//!   </Stmt></BkToCstmrStmt></Document>"#;
//!
//! let rows = camt053::extract_str(xml, "march.xml").unwrap();
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].entry.currency.as_deref(), Some("EUR"));
//! ```

pub mod fields;
mod rows;
mod tree;

use std::path::Path;

use tracing::debug;

pub use rows::{StatementContext, build_rows};
pub use tree::{Document, Element};

use crate::core::{BalanceType, CamtError, Row};

/// Extract all rows of one statement file, in document order.
///
/// The file content is parsed as XML regardless of its extension
/// (`.xml` and `.nda` are both common), in the encoding its XML declaration
/// names.
pub fn extract_file(path: impl AsRef<Path>) -> Result<Vec<Row>, CamtError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| CamtError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = Document::from_bytes(&bytes, source_name(path))?;
    extract_document(&doc)
}

/// Extract all rows from XML text; `source_file` is stamped on every row.
pub fn extract_str(xml: &str, source_file: impl Into<String>) -> Result<Vec<Row>, CamtError> {
    let doc = Document::parse(xml, source_file)?;
    extract_document(&doc)
}

/// Extract all rows from an already parsed document.
pub fn extract_document(doc: &Document) -> Result<Vec<Row>, CamtError> {
    let root = doc.root();
    let ctx = statement_context(doc)?;

    let mut rows = Vec::new();
    for ntry in doc.find_descendants(root, "Ntry") {
        rows.extend(build_rows(doc, &ctx, ntry)?);
    }

    debug!(
        file = doc.source(),
        namespace = doc.namespace(),
        rows = rows.len(),
        "extracted statement"
    );
    Ok(rows)
}

/// Account, statement and balance values of a document.
///
/// The first `Acct` and `Stmt` in the document are used; when a balance type
/// occurs more than once the last occurrence wins.
pub fn statement_context(doc: &Document) -> Result<StatementContext, CamtError> {
    let root = doc.root();
    let mut ctx = StatementContext {
        source_file: doc.source().to_string(),
        ..Default::default()
    };

    if let Some(acct) = doc.find_descendant(root, "Acct") {
        ctx.account = fields::account_info(doc, acct);
    }
    if let Some(stmt) = doc.find_descendant(root, "Stmt") {
        ctx.statement = fields::statement_info(doc, stmt);
    }
    for bal in doc.find_descendants(root, "Bal") {
        match fields::balance(doc, bal)? {
            Some((BalanceType::Opening, b)) => ctx.opening_balance = Some(b),
            Some((BalanceType::Closing, b)) => ctx.closing_balance = Some(b),
            None => {}
        }
    }

    Ok(ctx)
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
