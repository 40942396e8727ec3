//! Customers
//!
//! A customer is the owner of invoices. Its defaults (tax table, payment
//! terms) are offered to new invoice entries but never forced on them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{BillTermsId, Currency, CustomerId, ExactDecimal, TaxTableId};

use crate::address::Address;
use crate::error::PartyError;

/// A customer of the business
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Customer {
    pub id: CustomerId,
    /// Customer number as shown on invoices
    #[validate(length(min = 1, max = 2048))]
    pub number: String,
    #[validate(length(min = 1, max = 2048))]
    pub name: String,
    #[validate(nested)]
    pub address: Address,
    #[validate(nested)]
    pub shipping_address: Option<Address>,
    /// Currency invoices to this customer are denominated in
    pub currency: Currency,
    pub active: bool,
    /// Default discount percentage
    pub discount: Option<ExactDecimal>,
    pub credit_limit: Option<ExactDecimal>,
    /// Tax table suggested for new entries
    pub tax_table_id: Option<TaxTableId>,
    pub terms_id: Option<BillTermsId>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Creates a new, active customer
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` when number, name or address are invalid
    pub fn new(
        number: impl Into<String>,
        name: impl Into<String>,
        address: Address,
        currency: Currency,
    ) -> Result<Self, PartyError> {
        let customer = Self {
            id: CustomerId::new_v7(),
            number: number.into(),
            name: name.into(),
            address,
            shipping_address: None,
            currency,
            active: true,
            discount: None,
            credit_limit: None,
            tax_table_id: None,
            terms_id: None,
            notes: None,
            created_at: Utc::now(),
        };
        customer.validate()?;
        Ok(customer)
    }

    pub fn with_shipping_address(mut self, address: Address) -> Self {
        self.shipping_address = Some(address.shipping());
        self
    }

    pub fn with_tax_table(mut self, tax_table_id: TaxTableId) -> Self {
        self.tax_table_id = Some(tax_table_id);
        self
    }

    pub fn with_terms(mut self, terms_id: BillTermsId) -> Self {
        self.terms_id = Some(terms_id);
        self
    }

    pub fn with_credit_limit(mut self, limit: ExactDecimal) -> Self {
        self.credit_limit = Some(limit);
        self
    }

    /// Sets the default discount percentage
    ///
    /// # Errors
    ///
    /// Returns `InvalidData` when the percentage is outside 0..=100
    pub fn with_discount(mut self, percentage: ExactDecimal) -> Result<Self, PartyError> {
        if percentage.is_negative() || percentage > ExactDecimal::from_integer(100) {
            return Err(PartyError::invalid(format!(
                "discount must be between 0 and 100, got {percentage}"
            )));
        }
        self.discount = Some(percentage);
        Ok(self)
    }

    /// True if `outstanding` stays within the credit limit (no limit means unlimited)
    pub fn within_credit_limit(&self, outstanding: &ExactDecimal) -> bool {
        self.credit_limit.map_or(true, |limit| *outstanding <= limit)
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}
