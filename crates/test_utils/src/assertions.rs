//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::{AccountId, ExactDecimal};
use domain_billing::{Book, Split, Transaction};

/// Asserts that an exact decimal equals a decimal literal
///
/// # Panics
///
/// Panics if `expected` does not parse or the values differ
pub fn assert_decimal_eq(actual: ExactDecimal, expected: &str) {
    let expected_value = ExactDecimal::parse(expected)
        .unwrap_or_else(|e| panic!("Invalid expected decimal {expected:?}: {e}"));
    assert_eq!(
        actual,
        expected_value,
        "Decimal mismatch: actual={}, expected={}",
        actual.to_canonical_string(),
        expected
    );
}

/// Asserts that the split values of a transaction sum to exactly zero
///
/// # Panics
///
/// Panics if the transaction is unbalanced
pub fn assert_balanced(transaction: &Transaction) {
    let balance = transaction
        .balance()
        .unwrap_or_else(|e| panic!("Balance of transaction {} overflowed: {e}", transaction.id));
    assert!(
        balance.is_zero(),
        "Transaction {} is unbalanced by {} ({} splits)",
        transaction.id,
        balance,
        transaction.splits.len()
    );
}

/// Asserts that exactly one split of the transaction targets `account_id`
/// and returns it
///
/// # Panics
///
/// Panics if there are zero or several such splits
pub fn assert_single_split<'a>(transaction: &'a Transaction, account_id: &AccountId) -> &'a Split {
    let matching: Vec<&Split> = transaction
        .splits
        .iter()
        .filter(|split| split.account_id == *account_id)
        .collect();
    assert_eq!(
        matching.len(),
        1,
        "Expected exactly one split for account {}, found {}",
        account_id,
        matching.len()
    );
    matching[0]
}

/// Asserts that no split of the transaction targets `account_id`
pub fn assert_no_split(transaction: &Transaction, account_id: &AccountId) {
    assert!(
        transaction.splits.iter().all(|split| split.account_id != *account_id),
        "Unexpected split for account {}",
        account_id
    );
}

/// Asserts the raw balance of an account in the book
pub fn assert_account_balance(book: &Book, account_id: &AccountId, expected: &str) {
    let balance = book
        .balance(account_id)
        .unwrap_or_else(|| panic!("Account {account_id} is not in the book"));
    assert_decimal_eq(balance, expected);
}

/// Asserts that a result is Ok and returns the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Asserts that a result is Err and returns the error
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => e,
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => panic!("{}: got Ok({:?})", $msg, value),
            Err(e) => e,
        }
    };
}

/// Asserts that an error matches a specific variant
#[macro_export]
macro_rules! assert_err_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Ok(value) => panic!("Expected Err matching {}, got Ok({:?})", stringify!($pattern), value),
            Err(ref e) => {
                assert!(
                    matches!(e, $pattern),
                    "Error {:?} does not match pattern {}",
                    e,
                    stringify!($pattern)
                );
            }
        }
    };
}
