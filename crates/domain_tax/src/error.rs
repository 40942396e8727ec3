//! Tax domain errors

use core_kernel::DecimalError;
use thiserror::Error;

/// Errors that can occur in the tax domain
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxError {
    /// Tax table not found
    #[error("Tax table not found: {0}")]
    TaxTableNotFound(String),

    /// Tax table name is empty
    #[error("Tax table name must not be empty")]
    EmptyName,

    /// Percentages below zero are not tax rules
    #[error("Negative tax percentage: {0}")]
    NegativePercentage(String),

    /// Parent links loop back on themselves
    #[error("Cyclic parent chain at tax table {0}")]
    CyclicParent(String),

    /// Arithmetic error while computing a tax amount
    #[error("Tax calculation error: {0}")]
    Decimal(#[from] DecimalError),
}

impl TaxError {
    /// Creates a TaxTableNotFound error from any ID type
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        TaxError::TaxTableNotFound(id.to_string())
    }
}
