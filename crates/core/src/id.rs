//! Strongly-typed identifiers used across the domain.
//!
//! Both stores assign identifiers from a monotonically increasing serial, so
//! ordering by id is ordering by insertion.

use serde::{Deserialize, Serialize};

/// Identifier of an expected inventory item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryItemId(i64);

/// Identifier of a recorded scan.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanId(i64);

macro_rules! impl_serial_newtype {
    ($t:ty) => {
        impl $t {
            pub fn new(value: i64) -> Self {
                Self(value)
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }
    };
}

impl_serial_newtype!(InventoryItemId);
impl_serial_newtype!(ScanId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_by_serial() {
        assert!(InventoryItemId::new(1) < InventoryItemId::new(2));
        assert!(ScanId::new(10) > ScanId::new(9));
    }

    #[test]
    fn ids_convert_to_raw_serials() {
        assert_eq!(i64::from(ScanId::new(42)), 42);
        assert_eq!(InventoryItemId::new(7).to_string(), "7");
    }
}
