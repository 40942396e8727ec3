//! Jobs
//!
//! A job groups billable work for one customer or one vendor. It is never an
//! owner kind of its own when posting: every rule that depends on the owner
//! looks through the job to the party it wraps.

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{CustomerId, ExactDecimal, JobId, VendorId};

use crate::customer::Customer;
use crate::error::PartyError;
use crate::owner::OwnerKind;
use crate::vendor::Vendor;

/// The party a job is run for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobOwner {
    Customer(CustomerId),
    Vendor(VendorId),
}

impl JobOwner {
    /// Kind of the wrapped party; never `OwnerKind::Job`
    pub fn kind(&self) -> OwnerKind {
        match self {
            JobOwner::Customer(_) => OwnerKind::Customer,
            JobOwner::Vendor(_) => OwnerKind::Vendor,
        }
    }
}

impl From<&Customer> for JobOwner {
    fn from(customer: &Customer) -> Self {
        JobOwner::Customer(customer.id)
    }
}

impl From<&Vendor> for JobOwner {
    fn from(vendor: &Vendor) -> Self {
        JobOwner::Vendor(vendor.id)
    }
}

/// A job run for a customer or vendor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Job {
    pub id: JobId,
    #[validate(length(min = 1, max = 2048))]
    pub number: String,
    #[validate(length(min = 1, max = 2048))]
    pub name: String,
    /// Free-form reference, e.g. the customer's PO number
    pub reference: Option<String>,
    pub owner: JobOwner,
    pub active: bool,
    /// Hourly rate charged on this job
    pub rate: Option<ExactDecimal>,
}

impl Job {
    /// Creates a new, active job
    pub fn new(
        number: impl Into<String>,
        name: impl Into<String>,
        owner: impl Into<JobOwner>,
    ) -> Result<Self, PartyError> {
        let job = Self {
            id: JobId::new_v7(),
            number: number.into(),
            name: name.into(),
            reference: None,
            owner: owner.into(),
            active: true,
            rate: None,
        };
        job.validate()?;
        Ok(job)
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Sets the job rate
    ///
    /// # Errors
    ///
    /// Returns `InvalidData` for a negative rate
    pub fn with_rate(mut self, rate: ExactDecimal) -> Result<Self, PartyError> {
        if rate.is_negative() {
            return Err(PartyError::invalid(format!("job rate must not be negative, got {rate}")));
        }
        self.rate = Some(rate);
        Ok(self)
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}
