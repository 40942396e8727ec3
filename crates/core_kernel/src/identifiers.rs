//! Opaque identifiers for book records
//!
//! The ledger file addresses every record (account, transaction, split,
//! customer, ...) by an opaque GUID. Newtype wrappers keep these from being
//! mixed up across record kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates a new time-ordered identifier (v7)
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// GUID in the ledger file's form: 32 lowercase hex digits, no dashes
            pub fn to_guid(&self) -> String {
                self.0.simple().to_string()
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            /// Accepts the display form, a bare UUID, or a file GUID
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid_str = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

// Ledger records
define_id!(AccountId, "ACC");
define_id!(TransactionId, "TRX");
define_id!(SplitId, "SPL");

// Business records
define_id!(CustomerId, "CUS");
define_id!(VendorId, "VEN");
define_id!(JobId, "JOB");
define_id!(InvoiceId, "INV");
define_id!(EntryId, "ENT");
define_id!(TaxTableId, "TAX");
define_id!(BillTermsId, "TRM");
