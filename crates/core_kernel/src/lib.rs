//! Core Kernel - Foundational value types for the book access layer
//!
//! This crate provides the building blocks every other crate relies on:
//! - `ExactDecimal`, an exact rational used for every monetary value
//! - The ISO 4217 currency registry
//! - `FinancialIdentifier`, the `NAMESPACE:CODE` commodity identifier family
//! - Opaque identifiers for book records

pub mod decimal;
pub mod currency;
pub mod commodity;
pub mod identifiers;
pub mod error;

pub use decimal::{ExactDecimal, DecimalError, Sign};
pub use currency::Currency;
pub use commodity::{
    FinancialIdentifier, IdentifierType, IdentifierError,
    Exchange, Mic, SecIdType, CURRENCY_NAMESPACE,
};
pub use identifiers::{
    AccountId, TransactionId, SplitId, CustomerId, VendorId, JobId,
    InvoiceId, EntryId, TaxTableId, BillTermsId,
};
pub use error::CoreError;
