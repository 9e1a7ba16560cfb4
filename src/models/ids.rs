//! Strongly-typed ID wrappers for all entity types
//!
//! Identifiers are auto-incrementing integers handed out by the store. Using
//! newtype wrappers prevents accidentally mixing up IDs from different entity
//! types at compile time.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::num::ParseIntError;
use std::str::FromStr;

/// Behaviour shared by every store-assigned identifier
pub trait RecordId:
    Copy + Eq + Ord + Hash + fmt::Display + fmt::Debug + Serialize + DeserializeOwned
{
    /// Build an ID from its raw integer value
    fn from_raw(raw: u64) -> Self;

    /// The raw integer value
    fn raw(&self) -> u64;

    /// Whether the store has not assigned this ID yet
    fn is_unassigned(&self) -> bool {
        self.raw() == 0
    }
}

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Placeholder for records the store has not numbered yet
            pub const UNASSIGNED: Self = Self(0);

            /// Wrap a raw identifier
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the underlying integer
            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl RecordId for $name {
            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            fn raw(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Accept both "7" and "cli-7"
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(ClientId, "cli-");
define_id!(ServiceOrderId, "os-");
define_id!(PurchaseId, "pur-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(ClientId::new(7).to_string(), "cli-7");
        assert_eq!(ServiceOrderId::new(12).to_string(), "os-12");
        assert_eq!(PurchaseId::new(3).to_string(), "pur-3");
    }

    #[test]
    fn test_id_parse_with_and_without_prefix() {
        assert_eq!("7".parse::<ClientId>().unwrap(), ClientId::new(7));
        assert_eq!("cli-7".parse::<ClientId>().unwrap(), ClientId::new(7));
        assert!("pur-7".parse::<ClientId>().is_err());
        assert!("abc".parse::<PurchaseId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_plain_number() {
        let id = ServiceOrderId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");

        let deserialized: ServiceOrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_unassigned() {
        assert!(ClientId::UNASSIGNED.is_unassigned());
        assert!(ClientId::default().is_unassigned());
        assert!(!ClientId::new(1).is_unassigned());
    }
}
