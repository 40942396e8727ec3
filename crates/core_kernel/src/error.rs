//! Core error types used across the workspace

use thiserror::Error;
use crate::commodity::IdentifierError;
use crate::decimal::DecimalError;

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Decimal error: {0}")]
    Decimal(#[from] DecimalError),

    #[error("Identifier error: {0}")]
    Identifier(#[from] IdentifierError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        CoreError::NotFound(message.into())
    }

    /// True for malformed numeric or identifier input, which callers recover
    /// from by rejecting or re-prompting the input
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            CoreError::Decimal(DecimalError::Empty | DecimalError::Malformed(_) | DecimalError::Overflow)
                | CoreError::Identifier(IdentifierError::MalformedId(_))
        )
    }
}
