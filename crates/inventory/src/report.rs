//! Discrepancy report content: the summary plus the three exception lists.
//!
//! Rendering lives in infra; this module only decides *what* goes in.

use std::collections::HashMap;

use cyclecount_core::Entity;

use crate::item::InventoryItem;
use crate::scan::{ScanEvent, ScanStatus};
use crate::summary::{CycleCountSummary, InventorySnapshot};

/// A wrong-location scan joined with the item it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrongLocationEntry {
    pub item: InventoryItem,
    pub scan: ScanEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscrepancyReport {
    pub summary: CycleCountSummary,
    pub shortages: Vec<InventoryItem>,
    pub overages: Vec<ScanEvent>,
    pub wrong_locations: Vec<WrongLocationEntry>,
}

impl DiscrepancyReport {
    pub fn from_snapshot(snapshot: &InventorySnapshot) -> Self {
        let by_id: HashMap<_, _> = snapshot.items.iter().map(|i| (i.id(), i)).collect();

        // Inner join: a scan whose item is gone has nothing to report against.
        let wrong_locations = snapshot
            .scans_with_status(ScanStatus::WrongLocation)
            .filter_map(|scan| {
                let item = by_id.get(&scan.inventory_item_id()?)?;
                Some(WrongLocationEntry {
                    item: (*item).clone(),
                    scan: scan.clone(),
                })
            })
            .collect();

        Self {
            summary: snapshot.summary(),
            shortages: snapshot.shortages().cloned().collect(),
            overages: snapshot.scans_with_status(ScanStatus::Overage).cloned().collect(),
            wrong_locations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{ScanRequest, find_match, reconcile};
    use chrono::Utc;
    use cyclecount_core::{InventoryItemId, ScanId};

    fn item(id: i64, instrument: &str, location: &str) -> InventoryItem {
        InventoryItem {
            id: InventoryItemId::new(id),
            instrument_number: Some(instrument.to_string()),
            manufacturer_serial: None,
            description: format!("item {id}"),
            location: location.to_string(),
            created_at: Utc::now(),
        }
    }

    fn scans(items: &[InventoryItem], inputs: &[(&str, &str)]) -> Vec<ScanEvent> {
        inputs
            .iter()
            .enumerate()
            .map(|(i, (barcode, location))| {
                let req = ScanRequest::new(barcode, Some(*location)).unwrap();
                reconcile(&req, find_match(items, req.barcode()))
                    .to_new_scan()
                    .into_event(ScanId::new(i as i64 + 1), Utc::now())
            })
            .collect()
    }

    #[test]
    fn report_partitions_discrepancies() {
        let items = vec![item(1, "I1", "Room1"), item(2, "I2", "Room2"), item(3, "I3", "Room3")];
        let scans = scans(
            &items,
            &[("I1", "ROOM1"), ("I2", "Room5"), ("GHOST", "Dock"), ("GHOST", "Dock")],
        );

        let report = DiscrepancyReport::from_snapshot(&InventorySnapshot::new(items, scans));

        assert_eq!(report.summary.total_scans, 4);
        assert_eq!(report.shortages.len(), 1);
        assert_eq!(report.shortages[0].instrument_number.as_deref(), Some("I3"));

        assert_eq!(report.overages.len(), 2);
        assert!(report.overages.iter().all(|s| s.barcode() == "GHOST"));

        assert_eq!(report.wrong_locations.len(), 1);
        let entry = &report.wrong_locations[0];
        assert_eq!(entry.item.id, InventoryItemId::new(2));
        assert_eq!(entry.scan.expected_location(), Some("Room2"));
        assert_eq!(entry.scan.actual_location(), Some("Room5"));
    }

    #[test]
    fn wrong_location_without_item_is_dropped() {
        let items = vec![item(1, "I1", "Room1")];
        let scans = scans(&items, &[("I1", "Room4")]);

        let report = DiscrepancyReport::from_snapshot(&InventorySnapshot::new(Vec::new(), scans));
        assert!(report.wrong_locations.is_empty());
        assert_eq!(report.summary.wrong_locations, 1);
    }
}
