//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{Currency, Exchange, ExactDecimal, FinancialIdentifier, TaxTableId};
use domain_billing::{EntryDraft, TaxSpec};
use proptest::prelude::*;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop::sample::select(vec!["EUR", "USD", "GBP", "JPY", "CHF", "BHD", "SEK", "AUD"])
        .prop_map(|code| Currency::from_code(code).unwrap())
}

/// Strategy for amounts in minor units, possibly negative
pub fn amount_minor_strategy() -> impl Strategy<Value = i64> {
    -1_000_000_000i64..1_000_000_000i64
}

/// Strategy for exact amounts with two decimal places
pub fn amount_strategy() -> impl Strategy<Value = ExactDecimal> {
    amount_minor_strategy().prop_map(|minor| ExactDecimal::from_fraction(i128::from(minor), 100).unwrap())
}

/// Strategy for strictly positive exact amounts with two decimal places
pub fn positive_amount_strategy() -> impl Strategy<Value = ExactDecimal> {
    (1i64..100_000_000i64).prop_map(|minor| ExactDecimal::from_fraction(i128::from(minor), 100).unwrap())
}

/// Strategy for exact values without a finite decimal expansion, like 7/3
pub fn fraction_strategy() -> impl Strategy<Value = ExactDecimal> {
    (-100_000i128..100_000i128, prop::sample::select(vec![3i128, 7, 9, 11, 12]))
        .prop_map(|(numerator, denominator)| ExactDecimal::from_fraction(numerator, denominator).unwrap())
}

/// Strategy for quantities, including fractional ones
pub fn quantity_strategy() -> impl Strategy<Value = ExactDecimal> {
    (1i128..1_000i128, prop::sample::select(vec![1i128, 2, 3, 4, 10]))
        .prop_map(|(numerator, denominator)| ExactDecimal::from_fraction(numerator, denominator).unwrap())
}

/// Strategy for tax percentages between 0 and 30, in quarter steps
pub fn percentage_strategy() -> impl Strategy<Value = ExactDecimal> {
    (0i128..=120i128).prop_map(|quarters| ExactDecimal::from_fraction(quarters, 4).unwrap())
}

/// Strategy for identifier codes
pub fn identifier_code_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9]{1,7}"
}

/// Strategy for security identifiers of the general and exchange subtypes
///
/// Only namespaces long enough to pass `FinancialIdentifier::parse` are used.
pub fn security_identifier_strategy() -> impl Strategy<Value = FinancialIdentifier> {
    let general = ("[A-Z]{4,8}", identifier_code_strategy())
        .prop_filter("reserved namespace", |(namespace, _)| namespace != "CURRENCY")
        .prop_map(|(namespace, code)| FinancialIdentifier::new_security_general(&namespace, &code).unwrap());
    let parseable: Vec<Exchange> = Exchange::ALL.iter().copied().filter(|e| e.code().len() > 3).collect();
    let exchange = (prop::sample::select(parseable), identifier_code_strategy())
        .prop_map(|(exchange, code)| FinancialIdentifier::new_security_exchange(exchange, &code).unwrap());
    prop_oneof![general, exchange]
}

/// Strategy for the tax of an entry; `table` is used for table-taxed entries
pub fn tax_spec_strategy(table: TaxTableId) -> impl Strategy<Value = TaxSpec> {
    prop_oneof![
        Just(TaxSpec::None),
        (0i64..10_000i64).prop_map(|minor| TaxSpec::Amount(ExactDecimal::from_fraction(i128::from(minor), 100).unwrap())),
        Just(TaxSpec::Table(table)),
    ]
}

/// Strategy for entry drafts with positive prices
pub fn entry_draft_strategy(table: TaxTableId) -> impl Strategy<Value = EntryDraft> {
    (
        "[a-z]{3,12}",
        quantity_strategy(),
        positive_amount_strategy(),
        tax_spec_strategy(table),
        any::<bool>(),
    )
        .prop_map(|(description, quantity, price, tax, included)| {
            let draft = EntryDraft::new(description, quantity, price).with_tax(tax);
            if included && matches!(tax, TaxSpec::Table(_)) {
                draft.tax_included()
            } else {
                draft
            }
        })
}
