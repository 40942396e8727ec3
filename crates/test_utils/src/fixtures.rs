//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities of the book.
//! These fixtures are designed to be consistent and predictable for unit tests.

use chrono::NaiveDate;
use core_kernel::{Currency, ExactDecimal, FinancialIdentifier};
use domain_party::{Address, Customer, Job, Owner, Vendor};
use rust_decimal_macros::dec;

/// Fixture for currencies and commodity identifiers
pub struct CurrencyFixtures;

impl CurrencyFixtures {
    /// Book currency used throughout the tests
    pub fn eur() -> Currency {
        Currency::from_code("EUR").unwrap()
    }

    /// Second currency for mismatch tests
    pub fn usd() -> Currency {
        Currency::from_code("USD").unwrap()
    }

    /// `CURRENCY:EUR`
    pub fn eur_id() -> FinancialIdentifier {
        FinancialIdentifier::from(Self::eur())
    }

    /// A listed security, `NASDAQ:AAPL`
    pub fn security_id() -> FinancialIdentifier {
        FinancialIdentifier::new_security_general("NASDAQ", "AAPL").unwrap()
    }
}

/// Fixture for exact amounts
pub struct AmountFixtures;

impl AmountFixtures {
    /// 12.50, the standard line price
    pub fn twelve_fifty() -> ExactDecimal {
        ExactDecimal::from(dec!(12.50))
    }

    /// 100
    pub fn hundred() -> ExactDecimal {
        ExactDecimal::from_integer(100)
    }

    /// Standard VAT rate, 20%
    pub fn vat_rate() -> ExactDecimal {
        ExactDecimal::from_integer(20)
    }

    /// Reduced VAT rate, 7%
    pub fn reduced_rate() -> ExactDecimal {
        ExactDecimal::from_integer(7)
    }

    /// 1/3, for amounts without a finite decimal expansion
    pub fn one_third() -> ExactDecimal {
        ExactDecimal::from_fraction(1, 3).unwrap()
    }

    /// Flat tax amount for a single line
    pub fn flat_tax() -> ExactDecimal {
        ExactDecimal::from(dec!(1.25))
    }

    /// Parses a decimal literal such as `"-37.50"`
    pub fn parse(value: &str) -> ExactDecimal {
        ExactDecimal::parse(value).unwrap()
    }
}

/// Fixture for dates
pub struct DateFixtures;

impl DateFixtures {
    /// Date documents are opened
    pub fn opened() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    /// Date documents are posted
    pub fn posted() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    /// `posted()` plus the default 30 days
    pub fn default_due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 14).unwrap()
    }

    /// Last day of a leap February
    pub fn leap_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }
}

/// Fixture for customers, vendors and jobs
pub struct PartyFixtures;

impl PartyFixtures {
    /// Billing address
    pub fn address() -> Address {
        Address::new("Acme GmbH", "Hauptstrasse 1", "Berlin", "10115", "DE")
            .with_email("billing@acme.example")
    }

    /// Active EUR customer
    pub fn customer() -> Customer {
        Customer::new("C-0001", "Acme GmbH", Self::address(), CurrencyFixtures::eur()).unwrap()
    }

    /// Active EUR vendor
    pub fn vendor() -> Vendor {
        let address = Address::new("Supply AG", "Industrieweg 7", "Hamburg", "20095", "DE");
        Vendor::new("V-0001", "Supply AG", address, CurrencyFixtures::eur()).unwrap()
    }

    /// Job run for [`PartyFixtures::customer`]
    pub fn customer_job() -> Job {
        Job::new("J-0001", "Website relaunch", &Self::customer()).unwrap()
    }

    /// Job run for [`PartyFixtures::vendor`]
    pub fn vendor_job() -> Job {
        Job::new("J-0002", "Warehouse fit-out", &Self::vendor()).unwrap()
    }

    pub fn customer_owner() -> Owner {
        Owner::from(Self::customer())
    }

    pub fn vendor_owner() -> Owner {
        Owner::from(Self::vendor())
    }

    pub fn customer_job_owner() -> Owner {
        Owner::from(Self::customer_job())
    }

    pub fn vendor_job_owner() -> Owner {
        Owner::from(Self::vendor_job())
    }
}
