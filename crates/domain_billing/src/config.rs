//! Posting configuration

use rust_decimal::RoundingStrategy;
use serde::Deserialize;

use core_kernel::{Currency, ExactDecimal};

use crate::error::BillingError;

/// Posting configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PostingConfig {
    /// ISO 4217 code new documents default to
    pub default_currency: String,
    /// Decimal places amounts are rounded to for display
    pub display_decimal_places: u32,
    /// Prepended to the owner name in the transaction description
    pub transaction_description_prefix: String,
    /// Memo of the aggregated tax split
    pub tax_split_memo: String,
    /// Action label of the closing split; derived from the owner when unset
    pub receivable_split_action: Option<String>,
    /// Days until due when neither a due date nor terms are given
    pub default_due_days: u32,
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            default_currency: "EUR".to_string(),
            display_decimal_places: 2,
            transaction_description_prefix: String::new(),
            tax_split_memo: "Tax".to_string(),
            receivable_split_action: None,
            default_due_days: 30,
        }
    }
}

impl PostingConfig {
    /// Loads configuration from environment
    ///
    /// Reads `POSTING_*` variables, after loading a `.env` file if present.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        config::Config::builder()
            .add_source(config::Environment::with_prefix("POSTING"))
            .build()?
            .try_deserialize()
    }

    /// The configured default currency
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency` if the code is not ISO 4217
    pub fn currency(&self) -> Result<Currency, BillingError> {
        Currency::from_code(&self.default_currency)
            .ok_or_else(|| BillingError::UnknownCurrency(self.default_currency.clone()))
    }

    /// Formats an amount for display, rounding half away from zero
    pub fn format_amount(&self, amount: &ExactDecimal) -> Result<String, BillingError> {
        Ok(amount.to_display_string(
            self.display_decimal_places,
            RoundingStrategy::MidpointAwayFromZero,
        )?)
    }
}
