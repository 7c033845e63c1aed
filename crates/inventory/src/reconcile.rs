//! Scan reconciliation: turn a raw `(barcode, location)` pair into a status.

use cyclecount_core::{DomainError, DomainResult};

use crate::item::InventoryItem;
use crate::scan::{NewScan, ScanStatus};

/// A validated scan input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    barcode: String,
    location: Option<String>,
}

impl ScanRequest {
    /// Trim both fields. A blank barcode is rejected; a blank location means
    /// "no location supplied".
    pub fn new(barcode: &str, location: Option<&str>) -> DomainResult<Self> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(DomainError::validation("No barcode provided"));
        }

        let location = location
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        Ok(Self {
            barcode: barcode.to_string(),
            location,
        })
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// Classified scan plus the matched item (if any), for the caller's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub status: ScanStatus,
    pub barcode: String,
    pub actual_location: Option<String>,
    pub item: Option<InventoryItem>,
}

impl ScanOutcome {
    pub fn matched(&self) -> bool {
        self.item.is_some()
    }

    /// Expected location of the matched item; absent when unmatched or empty.
    pub fn expected_location(&self) -> Option<&str> {
        self.item
            .as_ref()
            .filter(|item| item.has_location())
            .map(|item| item.location.as_str())
    }

    /// The ledger entry to persist for this outcome.
    pub fn to_new_scan(&self) -> NewScan {
        NewScan {
            barcode: self.barcode.clone(),
            inventory_item_id: self.item.as_ref().map(|item| item.id),
            expected_location: self.expected_location().map(str::to_string),
            actual_location: self.actual_location.clone(),
            status: self.status,
        }
    }
}

/// Status of a matched scan given the item's expected location.
///
/// Order matters: an item without a recorded location is always
/// `NoLocationInSystem`, whatever location the scan carries.
pub fn classify(expected: &str, actual: Option<&str>) -> ScanStatus {
    if expected.is_empty() {
        return ScanStatus::NoLocationInSystem;
    }
    match actual {
        None | Some("") => ScanStatus::Found,
        Some(actual) if actual.to_uppercase() == expected.to_uppercase() => {
            ScanStatus::CorrectLocation
        }
        Some(_) => ScanStatus::WrongLocation,
    }
}

/// Reconcile a scan against the item its barcode resolved to (if any).
pub fn reconcile(request: &ScanRequest, matched: Option<&InventoryItem>) -> ScanOutcome {
    let status = match matched {
        None => ScanStatus::Overage,
        Some(item) => classify(&item.location, request.location()),
    };

    ScanOutcome {
        status,
        barcode: request.barcode.clone(),
        actual_location: request.location.clone(),
        item: matched.cloned(),
    }
}

/// Resolve a barcode against a set of items.
///
/// When several items carry the barcode the one with the lowest id wins.
pub fn find_match<'a, I>(items: I, barcode: &str) -> Option<&'a InventoryItem>
where
    I: IntoIterator<Item = &'a InventoryItem>,
{
    items
        .into_iter()
        .filter(|item| item.is_identified_by(barcode))
        .min_by_key(|item| item.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cyclecount_core::InventoryItemId;
    use proptest::prelude::*;

    fn item(id: i64, instrument: Option<&str>, serial: Option<&str>, location: &str) -> InventoryItem {
        InventoryItem {
            id: InventoryItemId::new(id),
            instrument_number: instrument.map(str::to_string),
            manufacturer_serial: serial.map(str::to_string),
            description: String::new(),
            location: location.to_string(),
            created_at: Utc::now(),
        }
    }

    fn scan(barcode: &str, location: &str) -> ScanRequest {
        ScanRequest::new(barcode, Some(location)).unwrap()
    }

    #[test]
    fn blank_barcode_is_rejected() {
        let err = ScanRequest::new("   ", Some("Room1")).unwrap_err();
        assert_eq!(err, DomainError::validation("No barcode provided"));
    }

    #[test]
    fn request_fields_are_trimmed() {
        let req = ScanRequest::new("  I1 ", Some("  ")).unwrap();
        assert_eq!(req.barcode(), "I1");
        assert_eq!(req.location(), None);
    }

    #[test]
    fn unmatched_scan_is_an_overage() {
        let outcome = reconcile(&scan("ZZZ", "Room1"), None);
        assert_eq!(outcome.status, ScanStatus::Overage);
        assert!(!outcome.matched());

        let new_scan = outcome.to_new_scan();
        assert!(!new_scan.matched());
        assert_eq!(new_scan.inventory_item_id(), None);
        assert_eq!(new_scan.expected_location(), None);
        assert_eq!(new_scan.actual_location(), Some("Room1"));
    }

    #[test]
    fn matched_scan_statuses() {
        let located = item(1, Some("I1"), None, "A-12");
        let unlocated = item(2, None, Some("S2"), "");

        assert_eq!(reconcile(&scan("I1", "a-12"), Some(&located)).status, ScanStatus::CorrectLocation);
        assert_eq!(reconcile(&scan("I1", "B-3"), Some(&located)).status, ScanStatus::WrongLocation);
        assert_eq!(
            reconcile(&ScanRequest::new("I1", None).unwrap(), Some(&located)).status,
            ScanStatus::Found
        );
        assert_eq!(reconcile(&scan("S2", "Room9"), Some(&unlocated)).status, ScanStatus::NoLocationInSystem);
    }

    #[test]
    fn matched_scan_copies_expected_location() {
        let located = item(4, Some("I4"), None, "Bay 7");
        let new_scan = reconcile(&scan("I4", "Bay 8"), Some(&located)).to_new_scan();

        assert!(new_scan.matched());
        assert_eq!(new_scan.inventory_item_id(), Some(InventoryItemId::new(4)));
        assert_eq!(new_scan.expected_location(), Some("Bay 7"));
        assert_eq!(new_scan.status(), ScanStatus::WrongLocation);
    }

    #[test]
    fn lowest_id_wins_on_duplicate_barcodes() {
        let items = vec![
            item(9, Some("DUP"), None, "Room9"),
            item(3, None, Some("DUP"), "Room3"),
            item(5, Some("DUP"), None, "Room5"),
        ];
        let found = find_match(&items, "DUP").unwrap();
        assert_eq!(found.id, InventoryItemId::new(3));
        assert!(find_match(&items, "dup").is_none());
    }

    proptest! {
        #[test]
        fn empty_expected_location_always_wins(actual in ".{0,12}") {
            prop_assert_eq!(classify("", Some(&actual)), ScanStatus::NoLocationInSystem);
            prop_assert_eq!(classify("", None), ScanStatus::NoLocationInSystem);
        }

        #[test]
        fn case_changes_do_not_affect_correct_location(expected in "[A-Za-z0-9-]{1,10}") {
            prop_assert_eq!(
                classify(&expected, Some(&expected.to_lowercase())),
                ScanStatus::CorrectLocation
            );
            prop_assert_eq!(
                classify(&expected, Some(&expected.to_uppercase())),
                ScanStatus::CorrectLocation
            );
        }

        #[test]
        fn differing_locations_are_wrong(expected in "[A-Z]{1,6}", suffix in "[0-9]{1,3}") {
            let actual = format!("{expected}-{suffix}");
            prop_assert_eq!(classify(&expected, Some(&actual)), ScanStatus::WrongLocation);
        }

        #[test]
        fn unknown_barcodes_never_match(barcode in "[a-z]{1,8}") {
            let items = vec![item(1, Some("I1"), Some("S1"), "Room1")];
            let req = ScanRequest::new(&barcode, Some("Room1")).unwrap();
            let outcome = reconcile(&req, find_match(&items, req.barcode()));
            prop_assert_eq!(outcome.status, ScanStatus::Overage);
            prop_assert!(!outcome.to_new_scan().matched());
        }
    }
}
