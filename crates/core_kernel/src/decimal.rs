//! Exact decimal arithmetic
//!
//! `ExactDecimal` is a reduced rational number backed by `i128` numerator and
//! denominator. Every monetary value in the book flows through this type, so
//! arithmetic never rounds: operations either produce the exact result or fail
//! with an explicit error. Rounding only happens on the way out, through
//! [`ExactDecimal::to_display_string`] with a caller-chosen strategy.
//!
//! # String grammar
//!
//! ```text
//! value    := ["-"] digits [ ("/" digits) | ("." digits) ]
//! digits   := [0-9]+
//! ```
//!
//! No exponents, no grouping separators and no surrounding whitespace.

use num_rational::Ratio;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, Signed, Zero};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building or combining exact decimals
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecimalError {
    #[error("Empty numeric input")]
    Empty,

    #[error("Malformed numeric input: {0:?}")]
    Malformed(String),

    #[error("Numeric value out of range")]
    Overflow,

    #[error("Division by zero")]
    DivideByZero,

    #[error("Quotient is not exactly representable")]
    InexactDivision,
}

/// Sign of an exact decimal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

/// A rational number kept in lowest terms with a positive denominator.
///
/// Two values are equal iff they are numerically equal, whatever string or
/// fraction they were built from (`"0.50"`, `"1/2"` and `"2/4"` are the same
/// value). The numerator is never `i128::MIN`, which keeps negation total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExactDecimal(Ratio<i128>);

const HUNDRED: ExactDecimal = ExactDecimal(Ratio::new_raw(100, 1));

impl ExactDecimal {
    /// The value zero
    pub const ZERO: ExactDecimal = ExactDecimal(Ratio::new_raw(0, 1));

    /// The value one
    pub const ONE: ExactDecimal = ExactDecimal(Ratio::new_raw(1, 1));

    fn from_ratio(ratio: Ratio<i128>) -> Result<Self, DecimalError> {
        if *ratio.numer() == i128::MIN {
            return Err(DecimalError::Overflow);
        }
        Ok(Self(ratio))
    }

    /// Builds a value from a numerator and denominator, reducing it
    pub fn from_fraction(numerator: i128, denominator: i128) -> Result<Self, DecimalError> {
        if denominator == 0 {
            return Err(DecimalError::DivideByZero);
        }
        if numerator == i128::MIN || denominator == i128::MIN {
            return Err(DecimalError::Overflow);
        }
        Self::from_ratio(Ratio::new(numerator, denominator))
    }

    /// Builds an integral value
    pub fn from_integer(value: i64) -> Self {
        Self(Ratio::from_integer(i128::from(value)))
    }

    /// Parses the decimal grammar described at the module level
    pub fn parse(input: &str) -> Result<Self, DecimalError> {
        if input.is_empty() {
            return Err(DecimalError::Empty);
        }

        let (negative, body) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input),
        };

        let (numerator, denominator) = if let Some((num, den)) = body.split_once('/') {
            let numerator = parse_digits(num, input)?;
            let denominator = parse_digits(den, input)?;
            if denominator == 0 {
                return Err(DecimalError::DivideByZero);
            }
            (numerator, denominator)
        } else if let Some((int, frac)) = body.split_once('.') {
            let whole = parse_digits(int, input)?;
            let fraction = parse_digits(frac, input)?;
            let scale = u32::try_from(frac.len()).map_err(|_| DecimalError::Overflow)?;
            let denominator = 10_i128.checked_pow(scale).ok_or(DecimalError::Overflow)?;
            let numerator = whole
                .checked_mul(denominator)
                .and_then(|w| w.checked_add(fraction))
                .ok_or(DecimalError::Overflow)?;
            (numerator, denominator)
        } else {
            (parse_digits(body, input)?, 1)
        };

        let numerator = if negative { -numerator } else { numerator };
        Self::from_fraction(numerator, denominator)
    }

    /// Reduced numerator (carries the sign)
    pub fn numerator(&self) -> i128 {
        *self.0.numer()
    }

    /// Reduced denominator (always positive)
    pub fn denominator(&self) -> i128 {
        *self.0.denom()
    }

    pub fn checked_add(&self, other: &ExactDecimal) -> Result<Self, DecimalError> {
        let sum = self.0.checked_add(&other.0).ok_or(DecimalError::Overflow)?;
        Self::from_ratio(sum)
    }

    pub fn checked_sub(&self, other: &ExactDecimal) -> Result<Self, DecimalError> {
        let difference = self.0.checked_sub(&other.0).ok_or(DecimalError::Overflow)?;
        Self::from_ratio(difference)
    }

    pub fn checked_mul(&self, other: &ExactDecimal) -> Result<Self, DecimalError> {
        let product = self.0.checked_mul(&other.0).ok_or(DecimalError::Overflow)?;
        Self::from_ratio(product)
    }

    /// Exact division.
    ///
    /// # Errors
    ///
    /// - `DivideByZero` when `divisor` is zero
    /// - `InexactDivision` when the exact quotient does not fit the
    ///   internal representation
    pub fn checked_div(&self, divisor: &ExactDecimal) -> Result<Self, DecimalError> {
        if divisor.is_zero() {
            return Err(DecimalError::DivideByZero);
        }
        let quotient = self.0.checked_div(&divisor.0).ok_or(DecimalError::InexactDivision)?;
        Self::from_ratio(quotient).map_err(|_| DecimalError::InexactDivision)
    }

    /// Returns `-self`
    pub fn negate(&self) -> Self {
        Self(-self.0)
    }

    /// Absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// True for values strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    /// True for values strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn sign(&self) -> Sign {
        match self.numerator().cmp(&0) {
            Ordering::Less => Sign::Negative,
            Ordering::Equal => Sign::Zero,
            Ordering::Greater => Sign::Positive,
        }
    }

    /// True when the value has no fractional part
    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    /// Computes `base * self / 100`, reading `self` as a percentage
    pub fn percent_of(&self, base: &ExactDecimal) -> Result<Self, DecimalError> {
        base.checked_mul(self)?.checked_div(&HUNDRED)
    }

    /// Lossless string form that parses back to the same value.
    ///
    /// Integers print without a decimal point, values whose denominator only
    /// has factors 2 and 5 print in decimal form, everything else prints as
    /// `numerator/denominator`.
    pub fn to_canonical_string(&self) -> String {
        if self.is_integer() {
            return self.numerator().to_string();
        }
        match self.terminating_parts() {
            Some((scaled, scale)) => format_scaled(scaled, scale),
            None => format!("{}/{}", self.numerator(), self.denominator()),
        }
    }

    /// Rounds to `decimal_places` with an explicit strategy for display.
    ///
    /// Arithmetic never rounds; this is the only place a value is
    /// approximated.
    pub fn to_display_string(
        &self,
        decimal_places: u32,
        strategy: RoundingStrategy,
    ) -> Result<String, DecimalError> {
        let factor = 10i128.checked_pow(decimal_places).ok_or(DecimalError::Overflow)?;
        let scaled = self.numerator().checked_mul(factor).ok_or(DecimalError::Overflow)?;
        let denominator = self.denominator();
        let quotient = scaled / denominator;
        let remainder = scaled % denominator;

        let rounded = if remainder == 0 {
            quotient
        } else {
            let step = if scaled < 0 { -1 } else { 1 };
            if rounds_away(quotient, remainder, denominator, scaled < 0, strategy) {
                quotient.checked_add(step).ok_or(DecimalError::Overflow)?
            } else {
                quotient
            }
        };

        if decimal_places == 0 {
            return Ok(rounded.to_string());
        }
        Ok(format_scaled(rounded, decimal_places))
    }

    /// Exact conversion into a `rust_decimal::Decimal`.
    ///
    /// # Errors
    ///
    /// - `InexactDivision` for values without a terminating decimal expansion
    /// - `Overflow` when the value exceeds `Decimal`'s range
    pub fn to_decimal(&self) -> Result<Decimal, DecimalError> {
        let (scaled, scale) = if self.is_integer() {
            (self.numerator(), 0)
        } else {
            self.terminating_parts().ok_or(DecimalError::InexactDivision)?
        };
        Decimal::try_from_i128_with_scale(scaled, scale).map_err(|_| DecimalError::Overflow)
    }

    /// For a denominator of the form 2^a * 5^b returns `(numerator * 10^s / denominator, s)`
    fn terminating_parts(&self) -> Option<(i128, u32)> {
        let mut rest = self.denominator();
        let mut twos = 0u32;
        let mut fives = 0u32;
        while rest % 2 == 0 {
            rest /= 2;
            twos += 1;
        }
        while rest % 5 == 0 {
            rest /= 5;
            fives += 1;
        }
        if rest != 1 {
            return None;
        }
        let scale = twos.max(fives);
        let factor = 10_i128.checked_pow(scale)? / self.denominator();
        let scaled = self.numerator().checked_mul(factor)?;
        Some((scaled, scale))
    }
}

fn parse_digits(digits: &str, input: &str) -> Result<i128, DecimalError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecimalError::Malformed(input.to_string()));
    }
    digits.parse::<i128>().map_err(|_| DecimalError::Overflow)
}

/// Whether truncating `quotient` must step one unit away from zero.
///
/// The choice is delegated to `rust_decimal` on a stand-in value that shares
/// the parity of the last kept digit and the position of the discarded
/// fraction relative to the midpoint.
fn rounds_away(
    quotient: i128,
    remainder: i128,
    denominator: i128,
    negative: bool,
    strategy: RoundingStrategy,
) -> bool {
    // |remainder| < denominator <= i128::MAX, so doubling fits in u128
    let fraction = match (remainder.unsigned_abs() * 2).cmp(&denominator.unsigned_abs()) {
        Ordering::Less => Decimal::new(25, 2),
        Ordering::Equal => Decimal::new(5, 1),
        Ordering::Greater => Decimal::new(75, 2),
    };
    let parity = Decimal::from(quotient.rem_euclid(2) as u8);
    let stand_in = if negative { -(parity + fraction) } else { parity + fraction };
    stand_in.round_dp_with_strategy(0, strategy).abs() > parity
}

fn format_scaled(scaled: i128, scale: u32) -> String {
    let digits = scaled.unsigned_abs().to_string();
    let scale = scale as usize;
    let padded = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (int, frac) = padded.split_at(padded.len() - scale);
    let sign = if scaled < 0 { "-" } else { "" };
    format!("{sign}{int}.{frac}")
}

impl Default for ExactDecimal {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for ExactDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl FromStr for ExactDecimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ExactDecimal {
    type Error = DecimalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ExactDecimal> for String {
    fn from(value: ExactDecimal) -> String {
        value.to_canonical_string()
    }
}

impl From<i64> for ExactDecimal {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl From<Decimal> for ExactDecimal {
    fn from(value: Decimal) -> Self {
        // Decimal's mantissa is 96 bits and its scale at most 28, both well inside i128
        Self(Ratio::new(value.mantissa(), 10_i128.pow(value.scale())))
    }
}

impl Add for ExactDecimal {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.checked_add(&other)
            .expect("Overflow in ExactDecimal::add")
    }
}

impl Sub for ExactDecimal {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.checked_sub(&other)
            .expect("Overflow in ExactDecimal::sub")
    }
}

impl Mul for ExactDecimal {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        self.checked_mul(&other)
            .expect("Overflow in ExactDecimal::mul")
    }
}

impl Neg for ExactDecimal {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

impl Sum for ExactDecimal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, value| acc + value)
    }
}

impl<'a> Sum<&'a ExactDecimal> for ExactDecimal {
    fn sum<I: Iterator<Item = &'a ExactDecimal>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, value| acc + *value)
    }
}
