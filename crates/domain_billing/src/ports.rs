//! Billing Domain Ports
//!
//! This module defines the port the posting engine uses to reach the book it
//! posts into, so the engine never depends on how the book is stored.
//!
//! # Architecture
//!
//! The `BookPort` trait covers everything posting needs from the ledger tree:
//! account lookups for type checks, tax table lookups, currency checks, and
//! inserting the finished transaction. Implementations:
//!
//! - **In-memory adapter**: [`Book`](crate::book::Book), used by tests and
//!   by callers that load a whole book up front
//! - **File-backed adapters**: provided by the ledger file layer
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_billing::ports::BookPort;
//!
//! fn income_accounts(book: &dyn BookPort, ids: &[AccountId]) -> Vec<AccountInfo> {
//!     ids.iter().filter_map(|id| book.account(id)).collect()
//! }
//! ```

use core_kernel::{AccountId, BillTermsId, FinancialIdentifier, TaxTableId, TransactionId};
use domain_tax::TaxTable;

use crate::account::AccountInfo;
use crate::error::BillingError;
use crate::terms::BillTerms;
use crate::transaction::Transaction;

/// Port trait for the book a document is posted into
///
/// Read methods never fail; a missing record is `None` and the caller
/// decides which error that is.
pub trait BookPort {
    /// Looks up an account
    fn account(&self, id: &AccountId) -> Option<AccountInfo>;

    /// Looks up a tax table by id
    fn tax_table(&self, id: &TaxTableId) -> Option<&TaxTable>;

    /// Looks up a tax table by its unique name
    fn tax_table_by_name(&self, name: &str) -> Option<&TaxTable>;

    /// Looks up bill terms
    fn bill_terms(&self, id: &BillTermsId) -> Option<&BillTerms>;

    /// True if documents may be denominated in `currency`
    fn is_known_currency(&self, currency: &FinancialIdentifier) -> bool;

    /// Stores a finished transaction
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if a split references an unknown account
    /// - `UnbalancedPosting` if the split values do not sum to zero
    fn insert_transaction(&mut self, transaction: Transaction) -> Result<TransactionId, BillingError>;
}
