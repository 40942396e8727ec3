//! Owner resolution
//!
//! Every business document is owned by exactly one party: a customer, a
//! vendor or a job. The owner decides which account types a document may
//! post to:
//!
//! | owner            | income/expense side | receivable/payable side |
//! |------------------|---------------------|-------------------------|
//! | Customer         | Income              | Receivable              |
//! | Vendor           | Expense             | Payable                 |
//! | Job(Customer)    | Income              | Receivable              |
//! | Job(Vendor)      | Expense             | Payable                 |
//!
//! A job delegates to whichever party it wraps. Asking a job for its
//! customer or vendor directly is an error; callers unwrap the job first.
//!
//! # Examples
//!
//! ```rust
//! use core_kernel::Currency;
//! use domain_party::{Address, Customer, Job, Owner, OwnerKind, AccountConstraint};
//!
//! let address = Address::new("Acme GmbH", "Hauptstr. 1", "Berlin", "10115", "DE");
//! let eur = Currency::from_code("EUR").unwrap();
//! let customer = Customer::new("C-001", "Acme GmbH", address, eur).unwrap();
//! let job = Job::new("J-001", "Website relaunch", &customer).unwrap();
//!
//! let owner = Owner::Job(job);
//! assert_eq!(owner.owner_kind(), OwnerKind::Job);
//! assert_eq!(owner.effective_kind(), OwnerKind::Customer);
//! assert_eq!(owner.resolve_income_expense_constraint(), AccountConstraint::Income);
//! assert!(owner.as_customer().is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use core_kernel::{BillTermsId, TaxTableId};

use crate::customer::Customer;
use crate::error::PartyError;
use crate::job::{Job, JobOwner};
use crate::vendor::Vendor;

/// Discriminant of an [`Owner`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerKind {
    Customer,
    Vendor,
    Job,
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OwnerKind::Customer => "customer",
            OwnerKind::Vendor => "vendor",
            OwnerKind::Job => "job",
        };
        f.write_str(label)
    }
}

/// The account type an owner requires on one side of a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountConstraint {
    Income,
    Expense,
    Receivable,
    Payable,
}

impl fmt::Display for AccountConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountConstraint::Income => "income",
            AccountConstraint::Expense => "expense",
            AccountConstraint::Receivable => "receivable",
            AccountConstraint::Payable => "payable",
        };
        f.write_str(label)
    }
}

/// The owner of a business document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Customer(Customer),
    Vendor(Vendor),
    Job(Job),
}

impl Owner {
    /// The owner's own discriminant; a job reports `Job`
    pub fn owner_kind(&self) -> OwnerKind {
        match self {
            Owner::Customer(_) => OwnerKind::Customer,
            Owner::Vendor(_) => OwnerKind::Vendor,
            Owner::Job(_) => OwnerKind::Job,
        }
    }

    /// The kind posting rules are derived from; a job reports its wrapped party
    pub fn effective_kind(&self) -> OwnerKind {
        match self {
            Owner::Job(job) => job.owner.kind(),
            other => other.owner_kind(),
        }
    }

    /// Account type required for the line-item (target) side
    pub fn resolve_income_expense_constraint(&self) -> AccountConstraint {
        match self.effective_kind() {
            OwnerKind::Vendor => AccountConstraint::Expense,
            _ => AccountConstraint::Income,
        }
    }

    /// Account type required for the closing (counter) side
    pub fn resolve_receivable_payable_constraint(&self) -> AccountConstraint {
        match self.effective_kind() {
            OwnerKind::Vendor => AccountConstraint::Payable,
            _ => AccountConstraint::Receivable,
        }
    }

    /// Borrows the customer
    ///
    /// # Errors
    ///
    /// Returns `WrongOwnerType` for vendors and for jobs, even jobs run for a
    /// customer
    pub fn as_customer(&self) -> Result<&Customer, PartyError> {
        match self {
            Owner::Customer(customer) => Ok(customer),
            other => Err(PartyError::wrong_owner(OwnerKind::Customer, other.owner_kind())),
        }
    }

    /// Borrows the vendor
    ///
    /// # Errors
    ///
    /// Returns `WrongOwnerType` for customers and for jobs
    pub fn as_vendor(&self) -> Result<&Vendor, PartyError> {
        match self {
            Owner::Vendor(vendor) => Ok(vendor),
            other => Err(PartyError::wrong_owner(OwnerKind::Vendor, other.owner_kind())),
        }
    }

    /// Borrows the job and the party it wraps
    pub fn unwrap_job(&self) -> Result<(&Job, JobOwner), PartyError> {
        match self {
            Owner::Job(job) => Ok((job, job.owner)),
            other => Err(PartyError::wrong_owner(OwnerKind::Job, other.owner_kind())),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Owner::Customer(customer) => &customer.name,
            Owner::Vendor(vendor) => &vendor.name,
            Owner::Job(job) => &job.name,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Owner::Customer(customer) => customer.active,
            Owner::Vendor(vendor) => vendor.active,
            Owner::Job(job) => job.active,
        }
    }

    /// Default tax table for new entries; jobs carry none
    pub fn default_tax_table(&self) -> Option<TaxTableId> {
        match self {
            Owner::Customer(customer) => customer.tax_table_id,
            Owner::Vendor(vendor) => vendor.tax_table_id,
            Owner::Job(_) => None,
        }
    }

    pub fn default_terms(&self) -> Option<BillTermsId> {
        match self {
            Owner::Customer(customer) => customer.terms_id,
            Owner::Vendor(vendor) => vendor.terms_id,
            Owner::Job(_) => None,
        }
    }
}

impl From<Customer> for Owner {
    fn from(customer: Customer) -> Self {
        Owner::Customer(customer)
    }
}

impl From<Vendor> for Owner {
    fn from(vendor: Vendor) -> Self {
        Owner::Vendor(vendor)
    }
}

impl From<Job> for Owner {
    fn from(job: Job) -> Self {
        Owner::Job(job)
    }
}
