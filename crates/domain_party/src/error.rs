//! Party domain errors
//!
//! This module defines all error types that can occur in the party domain,
//! including validation errors and owner discriminant mismatches.

use thiserror::Error;
use validator::ValidationErrors;

use crate::owner::OwnerKind;

/// Errors that can occur in the party domain
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PartyError {
    /// The owner was used as a kind it is not
    #[error("Wrong owner type: expected {expected}, found {actual}")]
    WrongOwnerType {
        expected: OwnerKind,
        actual: OwnerKind,
    },

    /// Invalid party data provided
    #[error("Invalid party data: {0}")]
    InvalidData(String),

    /// Party validation failed
    #[error("Party validation failed: {0}")]
    ValidationFailed(String),

    /// Cannot bill against an inactive owner
    #[error("Owner is inactive: {0}")]
    InactiveOwner(String),
}

impl PartyError {
    /// Creates an InvalidData error with a message
    pub fn invalid(message: impl Into<String>) -> Self {
        PartyError::InvalidData(message.into())
    }

    /// Creates a ValidationFailed error from validation errors
    pub fn validation_failed(errors: Vec<String>) -> Self {
        PartyError::ValidationFailed(errors.join("; "))
    }

    /// Creates a WrongOwnerType error
    pub fn wrong_owner(expected: OwnerKind, actual: OwnerKind) -> Self {
        PartyError::WrongOwnerType { expected, actual }
    }
}

impl From<ValidationErrors> for PartyError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .errors()
            .keys()
            .map(|field| format!("{field} is invalid"))
            .collect();
        messages.sort();
        PartyError::validation_failed(messages)
    }
}
