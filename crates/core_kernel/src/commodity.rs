//! Commodity and currency identifiers
//!
//! Every commodity in the book is addressed as `NAMESPACE:CODE`. The
//! namespace `CURRENCY` is reserved for ISO 4217 currencies; any other
//! namespace denotes a security. Securities whose namespace is a known stock
//! exchange, market identifier code (MIC) or security-identifier type get a
//! dedicated variant carrying the decoded value, so that `xetra:SAP` and
//! `XETRA:SAP` compare and hash equal once decoded.
//!
//! # Examples
//!
//! ```
//! use core_kernel::commodity::{FinancialIdentifier, IdentifierType};
//!
//! let eur: FinancialIdentifier = "CURRENCY:EUR".parse().unwrap();
//! assert_eq!(eur.id_type(), IdentifierType::Currency);
//!
//! let sap = FinancialIdentifier::parse("EURONEXT:SAP").unwrap();
//! assert_eq!(sap.id_type(), IdentifierType::SecurityGeneral);
//! assert_eq!(sap.to_canonical_string(), "EURONEXT:SAP");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::currency::Currency;

/// Namespace token reserved for ISO 4217 currencies
pub const CURRENCY_NAMESPACE: &str = "CURRENCY";

/// Separator between namespace and code
pub const SEPARATOR: char = ':';

/// Errors raised while building or inspecting identifiers
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    /// The string is not shaped like `NAMESPACE:CODE`
    #[error("Malformed commodity identifier: {0:?}")]
    MalformedId(String),

    /// The namespace is not acceptable for the requested identifier type
    #[error("Namespace {namespace:?} is not valid for identifier type {requested}")]
    InvalidType {
        requested: IdentifierType,
        namespace: String,
    },

    /// A subtype accessor was used on an identifier of another type
    #[error("Expected identifier of type {expected}, found {actual}")]
    WrongSubtype {
        expected: IdentifierType,
        actual: IdentifierType,
    },

    #[error("Unknown ISO 4217 currency code: {0:?}")]
    UnknownCurrency(String),

    #[error("Commodity {0} must not be empty")]
    Empty(&'static str),
}

/// Discriminant of a [`FinancialIdentifier`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentifierType {
    Currency,
    SecurityGeneral,
    SecurityExchange,
    SecurityMic,
    #[serde(rename = "SECURITY_SECIDTYPE")]
    SecuritySecIdType,
}

impl IdentifierType {
    pub fn is_security(&self) -> bool {
        !matches!(self, IdentifierType::Currency)
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IdentifierType::Currency => "CURRENCY",
            IdentifierType::SecurityGeneral => "SECURITY_GENERAL",
            IdentifierType::SecurityExchange => "SECURITY_EXCHANGE",
            IdentifierType::SecurityMic => "SECURITY_MIC",
            IdentifierType::SecuritySecIdType => "SECURITY_SECIDTYPE",
        };
        f.write_str(label)
    }
}

macro_rules! namespace_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every member of the enumeration
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical namespace token
            pub fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            /// Decodes a namespace token, ignoring ASCII case and surrounding whitespace
            pub fn from_code(code: &str) -> Option<Self> {
                let code = code.trim();
                Self::ALL.iter().copied().find(|value| value.code().eq_ignore_ascii_case(code))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

namespace_enum! {
    /// Stock exchanges used as commodity namespaces
    Exchange {
        Amex => "AMEX",
        Asx => "ASX",
        Bme => "BME",
        Eurex => "EUREX",
        Euronext => "EURONEXT",
        Fwb => "FWB",
        Hkex => "HKEX",
        Jpx => "JPX",
        Lse => "LSE",
        Nasdaq => "NASDAQ",
        Nyse => "NYSE",
        Six => "SIX",
        Tsx => "TSX",
        Xetra => "XETRA",
    }
}

namespace_enum! {
    /// ISO 10383 market identifier codes used as commodity namespaces
    Mic {
        Xams => "XAMS",
        Xase => "XASE",
        Xasx => "XASX",
        Xbru => "XBRU",
        Xcse => "XCSE",
        Xetr => "XETR",
        Xfra => "XFRA",
        Xhel => "XHEL",
        Xhkg => "XHKG",
        Xlis => "XLIS",
        Xlon => "XLON",
        Xmad => "XMAD",
        Xmil => "XMIL",
        Xnas => "XNAS",
        Xnys => "XNYS",
        Xosl => "XOSL",
        Xpar => "XPAR",
        Xsto => "XSTO",
        Xswx => "XSWX",
        Xtks => "XTKS",
        Xtse => "XTSE",
        Xwbo => "XWBO",
    }
}

namespace_enum! {
    /// Security identifier schemes used as commodity namespaces
    SecIdType {
        Cusip => "CUSIP",
        Figi => "FIGI",
        Isin => "ISIN",
        Sedol => "SEDOL",
        Valor => "VALOR",
        Wkn => "WKN",
    }
}

/// A validated commodity or currency identifier.
///
/// Values are immutable; re-typing goes through [`FinancialIdentifier::with_type`],
/// which validates the namespace again and returns a new value.
///
/// Serialized as `{ "type": "SECURITY_EXCHANGE", "id": "XETRA:SAP" }` so the
/// specialized type survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TaggedIdentifier", into = "TaggedIdentifier")]
pub enum FinancialIdentifier {
    Currency(Currency),
    SecurityGeneral { namespace: String, code: String },
    SecurityExchange { exchange: Exchange, code: String },
    SecurityMic { mic: Mic, code: String },
    SecuritySecIdType { sec_id_type: SecIdType, code: String },
}

fn is_currency_namespace(namespace: &str) -> bool {
    namespace.trim().eq_ignore_ascii_case(CURRENCY_NAMESPACE)
}

fn trimmed_code(code: &str) -> Result<String, IdentifierError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(IdentifierError::Empty("code"));
    }
    Ok(code.to_string())
}

/// Splits `NAMESPACE:CODE`, applying the separator boundary rule
/// `pos > 3 && pos < len - 2` (character positions, untrimmed input).
fn split_identifier(input: &str) -> Result<(&str, &str), IdentifierError> {
    let malformed = || IdentifierError::MalformedId(input.to_string());

    if input.matches(SEPARATOR).count() != 1 {
        return Err(malformed());
    }
    let length = input.chars().count();
    let pos_sep = input.chars().position(|c| c == SEPARATOR).ok_or_else(malformed)?;
    if !(pos_sep > 3 && pos_sep + 2 < length) {
        return Err(malformed());
    }

    let (namespace, code) = input.split_once(SEPARATOR).ok_or_else(malformed)?;
    let (namespace, code) = (namespace.trim(), code.trim());
    if namespace.is_empty() || code.is_empty() {
        return Err(malformed());
    }
    Ok((namespace, code))
}

impl FinancialIdentifier {
    /// Builds a currency identifier, validating the ISO 4217 code
    pub fn new_currency(code: &str) -> Result<Self, IdentifierError> {
        let code = trimmed_code(code)?;
        Currency::from_code(&code)
            .map(FinancialIdentifier::Currency)
            .ok_or(IdentifierError::UnknownCurrency(code))
    }

    /// Builds a security identifier with a free-form namespace
    pub fn new_security_general(namespace: &str, code: &str) -> Result<Self, IdentifierError> {
        let namespace = namespace.trim();
        if namespace.is_empty() {
            return Err(IdentifierError::Empty("namespace"));
        }
        if is_currency_namespace(namespace) {
            return Err(IdentifierError::InvalidType {
                requested: IdentifierType::SecurityGeneral,
                namespace: namespace.to_string(),
            });
        }
        Ok(FinancialIdentifier::SecurityGeneral {
            namespace: namespace.to_string(),
            code: trimmed_code(code)?,
        })
    }

    pub fn new_security_exchange(exchange: Exchange, code: &str) -> Result<Self, IdentifierError> {
        Ok(FinancialIdentifier::SecurityExchange { exchange, code: trimmed_code(code)? })
    }

    pub fn new_security_mic(mic: Mic, code: &str) -> Result<Self, IdentifierError> {
        Ok(FinancialIdentifier::SecurityMic { mic, code: trimmed_code(code)? })
    }

    pub fn new_security_sec_id_type(sec_id_type: SecIdType, code: &str) -> Result<Self, IdentifierError> {
        Ok(FinancialIdentifier::SecuritySecIdType { sec_id_type, code: trimmed_code(code)? })
    }

    /// Builds an identifier of the requested type from raw namespace and code,
    /// validating the namespace against that type's rules
    pub fn new(id_type: IdentifierType, namespace: &str, code: &str) -> Result<Self, IdentifierError> {
        let invalid = || IdentifierError::InvalidType {
            requested: id_type,
            namespace: namespace.trim().to_string(),
        };

        if id_type.is_security() && is_currency_namespace(namespace) {
            return Err(invalid());
        }

        match id_type {
            IdentifierType::Currency => {
                if !is_currency_namespace(namespace) {
                    return Err(invalid());
                }
                Self::new_currency(code)
            }
            IdentifierType::SecurityGeneral => Self::new_security_general(namespace, code),
            IdentifierType::SecurityExchange => {
                let exchange = Exchange::from_code(namespace).ok_or_else(invalid)?;
                Self::new_security_exchange(exchange, code)
            }
            IdentifierType::SecurityMic => {
                let mic = Mic::from_code(namespace).ok_or_else(invalid)?;
                Self::new_security_mic(mic, code)
            }
            IdentifierType::SecuritySecIdType => {
                let sec_id_type = SecIdType::from_code(namespace).ok_or_else(invalid)?;
                Self::new_security_sec_id_type(sec_id_type, code)
            }
        }
    }

    /// Parses `NAMESPACE:CODE`.
    ///
    /// The reserved `CURRENCY` namespace yields a currency identifier; any
    /// other namespace yields a general security identifier. Use
    /// [`FinancialIdentifier::parse_as`] to request a specialized type.
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        let (namespace, code) = split_identifier(input)?;
        let id_type = if is_currency_namespace(namespace) {
            IdentifierType::Currency
        } else {
            IdentifierType::SecurityGeneral
        };
        Self::new(id_type, namespace, code)
    }

    /// Parses `NAMESPACE:CODE` as a specific identifier type.
    ///
    /// A well-shaped string whose namespace does not fit the requested type
    /// fails with `InvalidType`; a string that is not identifier-shaped at all
    /// fails with `MalformedId`.
    pub fn parse_as(input: &str, id_type: IdentifierType) -> Result<Self, IdentifierError> {
        let (namespace, code) = split_identifier(input)?;
        Self::new(id_type, namespace, code)
    }

    /// Returns the same namespace and code re-validated as another type
    pub fn with_type(&self, id_type: IdentifierType) -> Result<Self, IdentifierError> {
        Self::new(id_type, self.namespace(), self.code())
    }

    pub fn id_type(&self) -> IdentifierType {
        match self {
            FinancialIdentifier::Currency(_) => IdentifierType::Currency,
            FinancialIdentifier::SecurityGeneral { .. } => IdentifierType::SecurityGeneral,
            FinancialIdentifier::SecurityExchange { .. } => IdentifierType::SecurityExchange,
            FinancialIdentifier::SecurityMic { .. } => IdentifierType::SecurityMic,
            FinancialIdentifier::SecuritySecIdType { .. } => IdentifierType::SecuritySecIdType,
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            FinancialIdentifier::Currency(_) => CURRENCY_NAMESPACE,
            FinancialIdentifier::SecurityGeneral { namespace, .. } => namespace,
            FinancialIdentifier::SecurityExchange { exchange, .. } => exchange.code(),
            FinancialIdentifier::SecurityMic { mic, .. } => mic.code(),
            FinancialIdentifier::SecuritySecIdType { sec_id_type, .. } => sec_id_type.code(),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            FinancialIdentifier::Currency(currency) => currency.code(),
            FinancialIdentifier::SecurityGeneral { code, .. }
            | FinancialIdentifier::SecurityExchange { code, .. }
            | FinancialIdentifier::SecurityMic { code, .. }
            | FinancialIdentifier::SecuritySecIdType { code, .. } => code,
        }
    }

    pub fn is_currency(&self) -> bool {
        matches!(self, FinancialIdentifier::Currency(_))
    }

    fn wrong_subtype(&self, expected: IdentifierType) -> IdentifierError {
        IdentifierError::WrongSubtype { expected, actual: self.id_type() }
    }

    pub fn currency(&self) -> Result<Currency, IdentifierError> {
        match self {
            FinancialIdentifier::Currency(currency) => Ok(*currency),
            _ => Err(self.wrong_subtype(IdentifierType::Currency)),
        }
    }

    pub fn exchange(&self) -> Result<Exchange, IdentifierError> {
        match self {
            FinancialIdentifier::SecurityExchange { exchange, .. } => Ok(*exchange),
            _ => Err(self.wrong_subtype(IdentifierType::SecurityExchange)),
        }
    }

    pub fn mic(&self) -> Result<Mic, IdentifierError> {
        match self {
            FinancialIdentifier::SecurityMic { mic, .. } => Ok(*mic),
            _ => Err(self.wrong_subtype(IdentifierType::SecurityMic)),
        }
    }

    pub fn sec_id_type(&self) -> Result<SecIdType, IdentifierError> {
        match self {
            FinancialIdentifier::SecuritySecIdType { sec_id_type, .. } => Ok(*sec_id_type),
            _ => Err(self.wrong_subtype(IdentifierType::SecuritySecIdType)),
        }
    }

    /// `NAMESPACE:CODE`
    pub fn to_canonical_string(&self) -> String {
        format!("{}{}{}", self.namespace(), SEPARATOR, self.code())
    }
}

impl From<Currency> for FinancialIdentifier {
    fn from(currency: Currency) -> Self {
        FinancialIdentifier::Currency(currency)
    }
}

impl fmt::Display for FinancialIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.namespace(), SEPARATOR, self.code())
    }
}

impl FromStr for FinancialIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FinancialIdentifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FinancialIdentifier> for String {
    fn from(id: FinancialIdentifier) -> String {
        id.to_canonical_string()
    }
}

/// Wire form of an identifier: its type next to the canonical string
#[derive(Serialize, Deserialize)]
struct TaggedIdentifier {
    #[serde(rename = "type")]
    id_type: IdentifierType,
    id: String,
}

impl From<FinancialIdentifier> for TaggedIdentifier {
    fn from(id: FinancialIdentifier) -> Self {
        TaggedIdentifier {
            id_type: id.id_type(),
            id: id.to_canonical_string(),
        }
    }
}

impl TryFrom<TaggedIdentifier> for FinancialIdentifier {
    type Error = IdentifierError;

    // No boundary rule here: `LSE:VOD` must read back even though `parse` rejects it
    fn try_from(tagged: TaggedIdentifier) -> Result<Self, Self::Error> {
        let (namespace, code) = tagged
            .id
            .split_once(SEPARATOR)
            .ok_or_else(|| IdentifierError::MalformedId(tagged.id.clone()))?;
        Self::new(tagged.id_type, namespace, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_rule() {
        // separator at index 3 is rejected, index 4 accepted
        assert!(matches!(
            FinancialIdentifier::parse("ABC:DEFG"),
            Err(IdentifierError::MalformedId(_))
        ));
        assert!(FinancialIdentifier::parse("ABCD:EF").is_ok());
        // at least two characters must follow the separator
        assert!(matches!(
            FinancialIdentifier::parse("ABCD:E"),
            Err(IdentifierError::MalformedId(_))
        ));
    }

    #[test]
    fn test_currency_namespace_is_reserved() {
        let err = FinancialIdentifier::new_security_general("CURRENCY", "EUR").unwrap_err();
        assert!(matches!(err, IdentifierError::InvalidType { .. }));
    }

    #[test]
    fn test_decoded_namespace_equality() {
        let lower = FinancialIdentifier::parse_as("xetra:SAP", IdentifierType::SecurityExchange).unwrap();
        let upper = FinancialIdentifier::new_security_exchange(Exchange::Xetra, "SAP").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.to_canonical_string(), "XETRA:SAP");
    }

    #[test]
    fn test_type_labels_match_display() {
        for id_type in [
            IdentifierType::Currency,
            IdentifierType::SecurityGeneral,
            IdentifierType::SecurityExchange,
            IdentifierType::SecurityMic,
            IdentifierType::SecuritySecIdType,
        ] {
            let json = serde_json::to_string(&id_type).unwrap();
            assert_eq!(json, format!("\"{id_type}\""));
        }
    }
}
