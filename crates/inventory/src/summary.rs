//! Aggregate counts over the inventory baseline and the scan ledger.

use std::collections::HashSet;

use serde::Serialize;

use cyclecount_core::Entity;

use crate::item::InventoryItem;
use crate::scan::{ScanEvent, ScanStatus};

/// Point-in-time read of both stores, each ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventorySnapshot {
    pub items: Vec<InventoryItem>,
    pub scans: Vec<ScanEvent>,
}

impl InventorySnapshot {
    pub fn new(mut items: Vec<InventoryItem>, mut scans: Vec<ScanEvent>) -> Self {
        items.sort_by_key(|i| i.id());
        scans.sort_by_key(|s| s.id());
        Self { items, scans }
    }

    /// Items never matched by any scan, whatever the scan's location outcome.
    pub fn shortages(&self) -> impl Iterator<Item = &InventoryItem> {
        let matched: HashSet<_> = self
            .scans
            .iter()
            .filter(|s| s.matched())
            .filter_map(ScanEvent::inventory_item_id)
            .collect();

        self.items.iter().filter(move |item| !matched.contains(&item.id()))
    }

    pub fn scans_with_status(&self, status: ScanStatus) -> impl Iterator<Item = &ScanEvent> {
        self.scans.iter().filter(move |s| s.status() == status)
    }

    pub fn summary(&self) -> CycleCountSummary {
        CycleCountSummary::compute(self)
    }
}

/// Cycle-count statistics.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleCountSummary {
    pub total_items: u64,
    pub total_scans: u64,
    pub matched_scans: u64,
    pub overages: u64,
    pub wrong_locations: u64,
    pub shortages: u64,
}

impl CycleCountSummary {
    pub fn compute(snapshot: &InventorySnapshot) -> Self {
        let count = |n: usize| n as u64;

        Self {
            total_items: count(snapshot.items.len()),
            total_scans: count(snapshot.scans.len()),
            matched_scans: count(snapshot.scans.iter().filter(|s| s.matched()).count()),
            overages: count(snapshot.scans_with_status(ScanStatus::Overage).count()),
            wrong_locations: count(snapshot.scans_with_status(ScanStatus::WrongLocation).count()),
            shortages: count(snapshot.shortages().count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{InventoryItemCandidate, InventoryRow};
    use crate::reconcile::{ScanRequest, find_match, reconcile};
    use chrono::Utc;
    use cyclecount_core::{InventoryItemId, ScanId};
    use proptest::prelude::*;

    fn items_from(rows: Vec<InventoryRow>) -> Vec<InventoryItem> {
        rows.into_iter()
            .filter_map(|r| InventoryItemCandidate::from_row(r).ok())
            .enumerate()
            .map(|(i, c)| c.into_item(InventoryItemId::new(i as i64 + 1), Utc::now()))
            .collect()
    }

    fn record(items: &[InventoryItem], scans: &mut Vec<ScanEvent>, barcode: &str, location: &str) -> ScanStatus {
        let req = ScanRequest::new(barcode, Some(location)).unwrap();
        let outcome = reconcile(&req, find_match(items, req.barcode()));
        let id = ScanId::new(scans.len() as i64 + 1);
        scans.push(outcome.to_new_scan().into_event(id, Utc::now()));
        outcome.status
    }

    fn row(instrument: &str, serial: &str, description: &str, location: &str) -> InventoryRow {
        let opt = |s: &str| Some(s.to_string());
        InventoryRow {
            instrument_number: opt(instrument),
            manufacturer_serial: opt(serial),
            description: opt(description),
            location: opt(location),
        }
    }

    #[test]
    fn empty_snapshot_has_zero_counts() {
        assert_eq!(InventorySnapshot::default().summary(), CycleCountSummary::default());
    }

    #[test]
    fn walkthrough_scenario() {
        let items = items_from(vec![
            row("I1", "", "DescA", "Room1"),
            row("", "S2", "DescB", ""),
        ]);
        let mut scans = Vec::new();

        assert_eq!(record(&items, &mut scans, "I1", "Room1"), ScanStatus::CorrectLocation);
        assert_eq!(record(&items, &mut scans, "S2", "Room9"), ScanStatus::NoLocationInSystem);
        assert_eq!(record(&items, &mut scans, "ZZZ", "Room1"), ScanStatus::Overage);

        let summary = InventorySnapshot::new(items, scans).summary();
        assert_eq!(
            summary,
            CycleCountSummary {
                total_items: 2,
                total_scans: 3,
                matched_scans: 2,
                overages: 1,
                wrong_locations: 0,
                shortages: 0,
            }
        );
    }

    #[test]
    fn wrong_location_is_not_a_shortage() {
        let items = items_from(vec![row("I1", "", "", "Room1"), row("I2", "", "", "Room2")]);
        let mut scans = Vec::new();
        record(&items, &mut scans, "I1", "Room7");

        let snapshot = InventorySnapshot::new(items, scans);
        let summary = snapshot.summary();
        assert_eq!(summary.wrong_locations, 1);
        assert_eq!(summary.shortages, 1);
        assert_eq!(snapshot.shortages().next().unwrap().instrument_number.as_deref(), Some("I2"));
    }

    #[test]
    fn rescans_count_as_separate_scans_but_one_match() {
        let items = items_from(vec![row("I1", "", "", "Room1")]);
        let mut scans = Vec::new();
        record(&items, &mut scans, "I1", "Room1");
        record(&items, &mut scans, "I1", "Room1");

        let summary = InventorySnapshot::new(items, scans).summary();
        assert_eq!(summary.total_scans, 2);
        assert_eq!(summary.matched_scans, 2);
        assert_eq!(summary.shortages, 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: N items, M distinct items matched once each ⇒ N - M shortages.
        #[test]
        fn shortages_are_items_minus_distinct_matches(n in 1usize..40, m_seed in 0usize..40, overages in 0usize..5) {
            let m = m_seed % (n + 1);
            let rows = (0..n)
                .map(|i| row(&format!("I{i}"), "", "", "Shelf"))
                .collect();
            let items = items_from(rows);
            let mut scans = Vec::new();

            for i in 0..m {
                record(&items, &mut scans, &format!("I{i}"), "Shelf");
            }
            for i in 0..overages {
                record(&items, &mut scans, &format!("X{i}"), "Shelf");
            }

            let summary = InventorySnapshot::new(items, scans).summary();
            prop_assert_eq!(summary.total_items, n as u64);
            prop_assert_eq!(summary.matched_scans, m as u64);
            prop_assert_eq!(summary.overages, overages as u64);
            prop_assert_eq!(summary.shortages, (n - m) as u64);
        }
    }
}
