//! Serialization of the projected table.
//!
//! Only comma-separated text is produced: one header row with the projected
//! column names, then one record per row. Decimals keep the scale they had in
//! the statement, booleans are written as `True`/`False` and absent values
//! as empty fields.

mod csv;

pub use self::csv::{to_csv_string, write_csv, write_csv_file};
