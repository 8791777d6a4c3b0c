//! Multi-document merge, invoice classification and column projection.
//!
//! # Example
//!
//! ```
//! use camt_recon::camt053;
//! use camt_recon::recon::{Converter, ProjectionMode, merge};
//!
//! let xml = r#"<Document xmlns="urn:iso:std:iso:20022:tech:xsd:camt.053.001.02">
//!   <BkToCstmrStmt><Stmt>
//!     <Ntry><Amt Ccy="EUR">99.00</Amt><CdtDbtInd>CRDT</CdtDbtInd>
//!       <NtryDtls><TxDtls><RmtInf><Ustrd>Invoice 1004711</Ustrd></RmtInf></TxDtls></NtryDtls>
//!     </Ntry>
//!   </Stmt></BkToCstmrStmt></Document>"#;
//!
//! let rows = merge([camt053::extract_str(xml, "a.xml").unwrap()]);
//! let table = Converter::new(ProjectionMode::Full).unwrap().finish(rows);
//! assert_eq!(table.value(0, "Inv.no.").map(|c| c.to_string()).as_deref(), Some("1004711"));
//! ```

pub mod batch;
mod classify;
mod project;

use std::path::Path;

use tracing::{info, warn};

pub use classify::{
    DisqualifyRule, INVOICE_NOTE, InvoiceClassifier, InvoicePolicy, RuleField, invoice_number,
};
pub use project::{ColumnProjector, ProjectionMode, Table};

use crate::camt053;
use crate::core::{CamtError, Row};

/// Concatenate per-document rows, keeping document and row order.
///
/// No deduplication and no cross-document aggregation happens here.
pub fn merge<I>(documents: I) -> Vec<Row>
where
    I: IntoIterator<Item = Vec<Row>>,
{
    documents.into_iter().flatten().collect()
}

/// Merged, enriched and projected result of one conversion run.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub table: Table,
    /// Number of input documents that were extracted.
    pub documents: usize,
}

impl Conversion {
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Runs merge → classification → projection for a chosen [`ProjectionMode`].
#[derive(Debug, Clone)]
pub struct Converter {
    mode: ProjectionMode,
    classifier: Option<InvoiceClassifier>,
    projector: ColumnProjector,
}

impl Converter {
    /// Converter with the default [`InvoicePolicy`].
    pub fn new(mode: ProjectionMode) -> Result<Self, CamtError> {
        Self::with_policy(mode, &InvoicePolicy::default())
    }

    pub fn with_policy(mode: ProjectionMode, policy: &InvoicePolicy) -> Result<Self, CamtError> {
        let classifier = if mode.classifies() {
            Some(InvoiceClassifier::new(policy)?)
        } else {
            None
        };
        Ok(Self {
            mode,
            classifier,
            projector: ColumnProjector::new(mode),
        })
    }

    /// Replace the column order of the mode.
    pub fn with_projector(mut self, projector: ColumnProjector) -> Self {
        self.projector = projector;
        self
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    /// Classify (full mode) and project already merged rows.
    pub fn finish(&self, mut rows: Vec<Row>) -> Table {
        if let Some(classifier) = &self.classifier {
            classifier.classify(&mut rows);
        }
        self.projector.project(&Table::from_rows(&rows))
    }

    /// Single-shot conversion of the selected files.
    ///
    /// The first document that fails aborts the whole run. An empty
    /// selection converts to an empty table.
    pub fn convert_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Conversion, CamtError> {
        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let rows = camt053::extract_file(path)?;
            info!(file = %path.as_ref().display(), rows = rows.len(), "processed");
            documents.push(rows);
        }

        let conversion = Conversion {
            documents: documents.len(),
            table: self.finish(merge(documents)),
        };
        if conversion.is_empty() && conversion.documents > 0 {
            warn!(documents = conversion.documents, "no data extracted from selected files");
        }
        Ok(conversion)
    }
}
