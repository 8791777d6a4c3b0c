use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while extracting, classifying or exporting statements.
///
/// Every document-level variant carries the basename of the offending file so
/// a batch run can report which input failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CamtError {
    /// The document is not well-formed XML.
    #[error("{file}: malformed XML: {message}")]
    MalformedDocument { file: String, message: String },

    /// A field declared numeric holds text that is not a number.
    #[error("{file}: cannot parse {field} value '{value}' as a number")]
    InvalidNumber {
        file: String,
        field: &'static str,
        value: String,
    },

    /// A well-formed number that does not fit a `Decimal` without rounding.
    #[error("{file}: {field} value '{value}' is outside the supported decimal range")]
    NumberOutOfRange {
        file: String,
        field: &'static str,
        value: String,
    },

    /// The root element carries no namespace, so no CAMT lookup can match.
    #[error("{file}: root element <{root}> declares no namespace; unsupported input")]
    MissingNamespace { file: String, root: String },

    /// Reading an input file or listing a directory failed.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An invoice policy could not be compiled into matchers.
    #[error("policy error: {0}")]
    Policy(String),

    /// Writing the output table failed.
    #[error("export error: {0}")]
    Export(String),
}

impl CamtError {
    /// Basename of the document the error belongs to, if any.
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::MalformedDocument { file, .. }
            | Self::InvalidNumber { file, .. }
            | Self::NumberOutOfRange { file, .. }
            | Self::MissingNamespace { file, .. } => Some(file),
            _ => None,
        }
    }
}
