use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cyclecount_core::{DomainError, DomainResult, Entity, InventoryItemId, ScanId};

/// Outcome of reconciling one scan against the baseline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanStatus {
    /// Matched, but no location was supplied with the scan.
    Found,
    CorrectLocation,
    WrongLocation,
    /// Matched an item that has no expected location recorded.
    NoLocationInSystem,
    /// Barcode is not in the baseline.
    Overage,
}

impl ScanStatus {
    pub const ALL: [ScanStatus; 5] = [
        ScanStatus::Found,
        ScanStatus::CorrectLocation,
        ScanStatus::WrongLocation,
        ScanStatus::NoLocationInSystem,
        ScanStatus::Overage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Found => "FOUND",
            ScanStatus::CorrectLocation => "CORRECT_LOCATION",
            ScanStatus::WrongLocation => "WRONG_LOCATION",
            ScanStatus::NoLocationInSystem => "NO_LOCATION_IN_SYSTEM",
            ScanStatus::Overage => "OVERAGE",
        }
    }
}

impl core::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScanStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown scan status: {s}")))
    }
}

/// A classified scan, not yet persisted.
///
/// Only produced by reconciliation, so `matched` always agrees with the
/// presence of an item reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScan {
    pub(crate) barcode: String,
    pub(crate) inventory_item_id: Option<InventoryItemId>,
    pub(crate) expected_location: Option<String>,
    pub(crate) actual_location: Option<String>,
    pub(crate) status: ScanStatus,
}

impl NewScan {
    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    pub fn matched(&self) -> bool {
        self.inventory_item_id.is_some()
    }

    pub fn inventory_item_id(&self) -> Option<InventoryItemId> {
        self.inventory_item_id
    }

    pub fn expected_location(&self) -> Option<&str> {
        self.expected_location.as_deref()
    }

    pub fn actual_location(&self) -> Option<&str> {
        self.actual_location.as_deref()
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    /// Attach store-assigned identity and timestamp.
    pub fn into_event(self, id: ScanId, scanned_at: DateTime<Utc>) -> ScanEvent {
        ScanEvent {
            id,
            matched: self.matched(),
            barcode: self.barcode,
            inventory_item_id: self.inventory_item_id,
            expected_location: self.expected_location,
            actual_location: self.actual_location,
            status: self.status,
            scanned_at,
        }
    }
}

/// One entry of the append-only scan ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanEvent {
    id: ScanId,
    barcode: String,
    matched: bool,
    inventory_item_id: Option<InventoryItemId>,
    expected_location: Option<String>,
    actual_location: Option<String>,
    status: ScanStatus,
    scanned_at: DateTime<Utc>,
}

impl ScanEvent {
    /// Rebuild a ledger entry from persisted columns.
    ///
    /// Rejects rows that break the unmatched-scan invariant.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: ScanId,
        barcode: String,
        matched: bool,
        inventory_item_id: Option<InventoryItemId>,
        expected_location: Option<String>,
        actual_location: Option<String>,
        status: ScanStatus,
        scanned_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if matched != inventory_item_id.is_some() {
            return Err(DomainError::invariant(format!(
                "scan {id}: matched={matched} disagrees with item reference"
            )));
        }
        if !matched && (expected_location.is_some() || status != ScanStatus::Overage) {
            return Err(DomainError::invariant(format!(
                "scan {id}: unmatched scan must be an overage without expected location"
            )));
        }
        if matched && status == ScanStatus::Overage {
            return Err(DomainError::invariant(format!(
                "scan {id}: matched scan cannot be an overage"
            )));
        }

        Ok(Self {
            id,
            barcode,
            matched,
            inventory_item_id,
            expected_location,
            actual_location,
            status,
            scanned_at,
        })
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    pub fn matched(&self) -> bool {
        self.matched
    }

    pub fn inventory_item_id(&self) -> Option<InventoryItemId> {
        self.inventory_item_id
    }

    pub fn expected_location(&self) -> Option<&str> {
        self.expected_location.as_deref()
    }

    pub fn actual_location(&self) -> Option<&str> {
        self.actual_location.as_deref()
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn scanned_at(&self) -> DateTime<Utc> {
        self.scanned_at
    }
}

impl Entity for ScanEvent {
    type Id = ScanId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_round_trips_for_every_variant() {
        for status in ScanStatus::ALL {
            assert_eq!(status.as_str().parse::<ScanStatus>().unwrap(), status);
        }
        assert!("MISSING".parse::<ScanStatus>().is_err());
    }

    #[test]
    fn status_serializes_in_wire_spelling() {
        let json = serde_json::to_string(&ScanStatus::NoLocationInSystem).unwrap();
        assert_eq!(json, "\"NO_LOCATION_IN_SYSTEM\"");
    }

    #[test]
    fn restore_rejects_unmatched_scan_with_item_reference() {
        let err = ScanEvent::restore(
            ScanId::new(1),
            "X".into(),
            false,
            Some(InventoryItemId::new(3)),
            None,
            None,
            ScanStatus::Overage,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn restore_rejects_unmatched_scan_with_non_overage_status() {
        let err = ScanEvent::restore(
            ScanId::new(1),
            "X".into(),
            false,
            None,
            None,
            Some("Room1".into()),
            ScanStatus::Found,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn restore_accepts_consistent_rows() {
        let event = ScanEvent::restore(
            ScanId::new(7),
            "I1".into(),
            true,
            Some(InventoryItemId::new(1)),
            Some("Room1".into()),
            Some("room1".into()),
            ScanStatus::CorrectLocation,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(event.id(), ScanId::new(7));
        assert!(event.matched());
    }
}
