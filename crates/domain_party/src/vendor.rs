//! Vendors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{BillTermsId, Currency, TaxTableId, VendorId};

use crate::address::Address;
use crate::error::PartyError;

/// A supplier whose bills are entered into the book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Vendor {
    pub id: VendorId,
    #[validate(length(min = 1, max = 2048))]
    pub number: String,
    #[validate(length(min = 1, max = 2048))]
    pub name: String,
    #[validate(nested)]
    pub address: Address,
    pub currency: Currency,
    pub active: bool,
    pub tax_table_id: Option<TaxTableId>,
    pub terms_id: Option<BillTermsId>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Vendor {
    /// Creates a new, active vendor
    pub fn new(
        number: impl Into<String>,
        name: impl Into<String>,
        address: Address,
        currency: Currency,
    ) -> Result<Self, PartyError> {
        let vendor = Self {
            id: VendorId::new_v7(),
            number: number.into(),
            name: name.into(),
            address,
            currency,
            active: true,
            tax_table_id: None,
            terms_id: None,
            notes: None,
            created_at: Utc::now(),
        };
        vendor.validate()?;
        Ok(vendor)
    }

    pub fn with_tax_table(mut self, tax_table_id: TaxTableId) -> Self {
        self.tax_table_id = Some(tax_table_id);
        self
    }

    pub fn with_terms(mut self, terms_id: BillTermsId) -> Self {
        self.terms_id = Some(terms_id);
        self
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}
