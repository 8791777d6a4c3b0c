//! Core statement types, table columns and the crate error type.
//!
//! The typed records mirror the CAMT.053 blocks the extractor reads
//! (`Acct`, `Stmt`, `Bal`, `Ntry`, `TxDtls`); a [`Row`] overlays them into one
//! flattened line of the reconciliation table.

mod columns;
mod error;
mod types;

pub use columns::*;
pub use error::*;
pub use types::*;
