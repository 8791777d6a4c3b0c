//! Directory batch processing: failed files are logged and skipped.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info, warn};

use super::{Converter, Table, merge};
use crate::camt053;
use crate::core::CamtError;

/// Extensions recognized as statement files.
pub const STATEMENT_EXTENSIONS: &[&str] = &["xml", "nda"];

/// Default output file name of a batch run.
pub const DEFAULT_OUTPUT: &str = "output_all.csv";

/// Outcome of one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub file: String,
    pub rows: usize,
    /// Error message when extraction failed; the file then contributes no rows.
    pub error: Option<String>,
}

impl FileReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of [`process_directory`].
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub reports: Vec<FileReport>,
    pub table: Table,
}

impl BatchOutcome {
    pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
        self.reports.iter().filter(|r| !r.is_ok())
    }
}

/// Statement files directly inside `dir` (no recursion), sorted by name.
pub fn list_statement_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, CamtError> {
    let dir = dir.as_ref();
    let io_err = |source: std::io::Error| CamtError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && is_statement_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_statement_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| STATEMENT_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
}

/// Extract every statement file in `dir`, skipping files that fail, then
/// merge, classify and project the rest.
pub fn process_directory(
    dir: impl AsRef<Path>,
    converter: &Converter,
) -> Result<BatchOutcome, CamtError> {
    let files = list_statement_files(dir)?;
    Ok(process_files(&files, converter))
}

/// Batch-mode conversion of an explicit file list.
pub fn process_files<P: AsRef<Path>>(files: &[P], converter: &Converter) -> BatchOutcome {
    let mut reports = Vec::with_capacity(files.len());
    let mut documents = Vec::with_capacity(files.len());

    for path in files {
        let path = path.as_ref();
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match camt053::extract_file(path) {
            Ok(rows) => {
                info!(file = %file, rows = rows.len(), "processed");
                reports.push(FileReport {
                    file,
                    rows: rows.len(),
                    error: None,
                });
                documents.push(rows);
            }
            Err(e) => {
                error!(file = %file, error = %e, "skipping file");
                reports.push(FileReport {
                    file,
                    rows: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let table = converter.finish(merge(documents));
    if table.is_empty() {
        warn!("no data extracted from any files");
    }
    BatchOutcome { reports, table }
}
