//! Party Domain
//!
//! This crate manages the parties business documents are issued to or
//! received from:
//!
//! - **Customer**: receives invoices, posts to income and receivable accounts
//! - **Vendor**: issues bills, posts to expense and payable accounts
//! - **Job**: billable work run for a customer or vendor, posting with the
//!   rules of the party it wraps
//!
//! [`Owner`] is the closed variant over these three and answers which
//! account types a document owned by it may touch.

pub mod address;
pub mod customer;
pub mod vendor;
pub mod job;
pub mod owner;
pub mod error;

pub use address::{Address, AddressType};
pub use customer::Customer;
pub use vendor::Vendor;
pub use job::{Job, JobOwner};
pub use owner::{AccountConstraint, Owner, OwnerKind};
pub use error::PartyError;
