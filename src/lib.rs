//! # camt-recon
//!
//! Flattens ISO 20022 CAMT.053 bank statements into a reconciliation table:
//! one row per transaction detail, with account, statement and balance values
//! repeated on every row, plus an "is this an invoice payment" flag and a
//! derived invoice number.
//!
//! All amounts use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use camt_recon::camt053;
//! use camt_recon::recon::{Converter, ProjectionMode, merge};
//!
//! let xml = r#"<Document xmlns="urn:iso:std:iso:20022:tech:xsd:camt.053.001.02">
//!   <BkToCstmrStmt><Stmt>
//!     <Acct><Id><IBAN>DE89370400440532013000</IBAN></Id></Acct>
//!     <Ntry><Amt Ccy="EUR">250.00</Amt><CdtDbtInd>CRDT</CdtDbtInd>
//!       <NtryDtls><TxDtls>
//!         <RltdPties><Dbtr><Nm>Kunde AG</Nm></Dbtr></RltdPties>
//!         <RmtInf><Ustrd>RE 2024001</Ustrd></RmtInf>
//!       </TxDtls></NtryDtls>
//!     </Ntry>
//!   </Stmt></BkToCstmrStmt></Document>"#;
//!
//! let rows = merge([camt053::extract_str(xml, "march.xml").unwrap()]);
//! let table = Converter::new(ProjectionMode::Full).unwrap().finish(rows);
//!
//! assert_eq!(table.len(), 1);
//! assert_eq!(table.value(0, "is_invoice_payment").unwrap().to_string(), "True");
//! assert_eq!(table.value(0, "Inv.no.").unwrap().to_string(), "2024001");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Statement types, columns, errors |
//! | `camt053` | CAMT.053 XML extraction |
//! | `recon` | Merge, invoice classification, column projection, batch runs |
//! | `csv` | CSV export of the projected table |
//! | `cli` | The `camt-recon` command-line tool |
//! | `all` | Everything except the CLI |
//!
//! `camt053`, `recon` and `csv` are enabled by default.

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "camt053")]
pub mod camt053;

#[cfg(feature = "recon")]
pub mod recon;

#[cfg(all(feature = "csv", feature = "recon"))]
pub mod export;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
