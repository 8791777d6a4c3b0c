use std::io::Write;
use std::path::Path;

use crate::core::CamtError;
use crate::recon::Table;

fn export_err(e: impl std::fmt::Display) -> CamtError {
    CamtError::Export(e.to_string())
}

/// Write `table` as CSV to any writer.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<(), CamtError> {
    let mut out = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    out.write_record(table.columns()).map_err(export_err)?;
    for row in table.rows() {
        out.write_record(
            row.iter()
                .map(|cell| cell.as_ref().map(|c| c.to_string()).unwrap_or_default()),
        )
        .map_err(export_err)?;
    }
    out.flush().map_err(export_err)
}

/// Render `table` as a CSV string.
pub fn to_csv_string(table: &Table) -> Result<String, CamtError> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    String::from_utf8(buf).map_err(export_err)
}

/// Write `table` to a CSV file, replacing any existing file.
pub fn write_csv_file(table: &Table, path: impl AsRef<Path>) -> Result<(), CamtError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|source| CamtError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(table, std::io::BufWriter::new(file))
}
