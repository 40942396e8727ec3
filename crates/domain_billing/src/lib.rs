//! Billing Domain - Document posting into a double-entry book
//!
//! This crate posts business documents (customer invoices, vendor bills and
//! job invoices) as balanced transactions, keeping every amount exact.
//!
//! # Posting Principles
//!
//! Every posted document creates exactly one transaction whose split values
//! sum to exactly zero:
//! - one split per income/expense account used by the entries
//! - one split for the aggregated tax, if any
//! - one receivable/payable split closing the transaction
//!
//! The owner of a document decides which account types each side may use;
//! see [`domain_party::Owner`].
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{EntryDraft, InvoiceDocument, PostingEngine, PostingRequest, TaxSpec};
//!
//! let mut invoice = InvoiceDocument::new(customer.into(), eur, opened)?;
//! invoice.create_entry(EntryDraft::new("Consulting", hours, rate).with_tax(TaxSpec::Table(vat)))?;
//!
//! let engine = PostingEngine::default();
//! let transaction = engine.post(&mut invoice, &mut book, &PostingRequest::new(income, receivable, today))?;
//! assert!(transaction.is_balanced());
//! ```

pub mod account;
pub mod terms;
pub mod transaction;
pub mod invoice;
pub mod posting;
pub mod ports;
pub mod book;
pub mod events;
pub mod config;
pub mod error;

pub use account::{Account, AccountInfo, AccountType};
pub use terms::{BillTerms, TermsKind};
pub use transaction::{Split, Transaction};
pub use invoice::{
    DocumentKind, DocumentState, DocumentTotals, Entry, EntryDraft, InvoiceDocument,
    TaxInclusion, TaxSpec,
};
pub use posting::{entry_amounts, EntryAmounts, PostingEngine, PostingRequest};
pub use ports::BookPort;
pub use book::Book;
pub use events::DocumentEvent;
pub use config::PostingConfig;
pub use error::BillingError;
