//! Address types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Address type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressType {
    Billing,
    Shipping,
}

/// A postal address with contact details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Address {
    pub address_type: AddressType,
    /// Addressee, usually the company or contact name
    #[validate(length(min = 1, max = 1024))]
    pub name: String,
    #[validate(length(min = 1, max = 1024))]
    pub line1: String,
    pub line2: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub city: String,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2
    #[validate(length(equal = 2))]
    pub country: String,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

impl Address {
    /// Creates a new billing address
    pub fn new(
        name: impl Into<String>,
        line1: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            address_type: AddressType::Billing,
            name: name.into(),
            line1: line1.into(),
            line2: None,
            city: city.into(),
            postal_code: postal_code.into(),
            country: country.into(),
            phone: None,
            email: None,
        }
    }

    /// Turns this into a shipping address
    pub fn shipping(mut self) -> Self {
        self.address_type = AddressType::Shipping;
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Formats address for printing on a document
    pub fn format(&self) -> String {
        let mut lines = vec![self.name.clone(), self.line1.clone()];
        if let Some(l2) = &self.line2 {
            lines.push(l2.clone());
        }
        lines.push(format!("{} {}", self.postal_code, self.city).trim().to_string());
        lines.push(self.country.clone());
        lines.join("\n")
    }
}
