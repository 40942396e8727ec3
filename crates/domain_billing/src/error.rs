//! Billing domain errors

use thiserror::Error;

use core_kernel::{DecimalError, ExactDecimal};
use domain_party::{AccountConstraint, PartyError};
use domain_tax::TaxError;

use crate::account::AccountType;

/// Errors that can occur in the billing domain
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BillingError {
    /// Account not found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account already exists
    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    /// An account of the wrong type was offered for a posting side
    #[error("Account {account} is of type {actual}, expected {expected}")]
    WrongAccountType {
        account: String,
        expected: AccountConstraint,
        actual: AccountType,
    },

    /// Posting a document without entries
    #[error("Document has no entries")]
    EmptyDocument,

    /// Posting a document that already has a posting transaction
    #[error("Document already posted: {0}")]
    AlreadyPosted(String),

    /// Adding or removing entries on a posted document
    #[error("Document is not modifiable: {0}")]
    NotModifiable(String),

    /// Split values do not sum to zero
    #[error("Unbalanced posting: splits sum to {imbalance}")]
    UnbalancedPosting { imbalance: ExactDecimal },

    /// Tax table not found
    #[error("Tax table not found: {0}")]
    TaxTableNotFound(String),

    /// A tax table with the same name is already in the book
    #[error("Duplicate tax table name: {0}")]
    DuplicateTaxTable(String),

    /// Tax is due but no account to book it against could be determined
    #[error("Tax amount is non-zero but no tax account is available")]
    MissingTaxAccount,

    /// Document entry not found
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// The book does not carry the document's currency
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// The document refers to bill terms the book does not hold
    #[error("Bill terms not found: {0}")]
    BillTermsNotFound(String),

    /// Bill terms are inconsistent
    #[error("Invalid bill terms: {0}")]
    InvalidTerms(String),

    /// Date arithmetic left the supported calendar range
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    /// Arithmetic error
    #[error("Calculation error: {0}")]
    Decimal(#[from] DecimalError),

    /// Tax resolution error
    #[error("Tax error: {0}")]
    Tax(#[from] TaxError),

    /// Owner error
    #[error("Owner error: {0}")]
    Party(#[from] PartyError),
}

impl BillingError {
    /// Creates an AccountNotFound error from any ID type
    pub fn account_not_found(id: impl std::fmt::Display) -> Self {
        BillingError::AccountNotFound(id.to_string())
    }

    /// Creates a TaxTableNotFound error from any ID type
    pub fn tax_table_not_found(id: impl std::fmt::Display) -> Self {
        BillingError::TaxTableNotFound(id.to_string())
    }

    /// True for the business-rule violations a document can hit when posting
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            BillingError::WrongAccountType { .. }
                | BillingError::EmptyDocument
                | BillingError::AlreadyPosted(_)
                | BillingError::UnbalancedPosting { .. }
                | BillingError::NotModifiable(_)
        )
    }
}
