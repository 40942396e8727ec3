//! Tax Domain - Percentage tax tables
//!
//! This crate provides:
//! - Tax tables with per-account percentage rules
//! - Exact tax amount resolution for a base amount
//! - Opt-in parent chain resolution

pub mod table;
pub mod chain;
pub mod error;

pub use table::{TaxTable, TaxTableEntry};
pub use chain::{ancestors, effective_entries, TaxTableLookup};
pub use error::TaxError;
