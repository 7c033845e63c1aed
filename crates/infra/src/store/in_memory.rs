use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use cyclecount_core::{InventoryItemId, ScanId};
use cyclecount_inventory::{
    InventoryItem, InventoryItemCandidate, InventorySnapshot, NewScan, ScanEvent, find_match,
};

use super::{CycleCountStore, StoreError};

#[derive(Debug, Default)]
struct State {
    items: Vec<InventoryItem>,
    scans: Vec<ScanEvent>,
    // Serials keep counting across purges, like BIGSERIAL columns.
    last_item_id: i64,
    last_scan_id: i64,
}

/// In-memory store.
///
/// Intended for tests/dev. One `RwLock` guards both collections, so every
/// operation is atomic with respect to the others.
#[derive(Debug, Default)]
pub struct InMemoryCycleCountStore {
    state: RwLock<State>,
}

impl InMemoryCycleCountStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl CycleCountStore for InMemoryCycleCountStore {
    async fn init_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }

    async fn replace_inventory(&self, items: Vec<InventoryItemCandidate>) -> Result<usize, StoreError> {
        let mut state = self.write()?;
        state.scans.clear();
        state.items.clear();

        let now = Utc::now();
        for candidate in items {
            state.last_item_id += 1;
            let id = InventoryItemId::new(state.last_item_id);
            state.items.push(candidate.into_item(id, now));
        }
        Ok(state.items.len())
    }

    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<InventoryItem>, StoreError> {
        let state = self.read()?;
        Ok(find_match(&state.items, barcode).cloned())
    }

    async fn append_scan(&self, scan: NewScan) -> Result<ScanEvent, StoreError> {
        let mut state = self.write()?;
        state.last_scan_id += 1;
        let event = scan.into_event(ScanId::new(state.last_scan_id), Utc::now());
        state.scans.push(event.clone());
        Ok(event)
    }

    async fn clear_scans(&self) -> Result<u64, StoreError> {
        let mut state = self.write()?;
        let removed = state.scans.len() as u64;
        state.scans.clear();
        Ok(removed)
    }

    async fn snapshot(&self) -> Result<InventorySnapshot, StoreError> {
        let state = self.read()?;
        Ok(InventorySnapshot::new(state.items.clone(), state.scans.clone()))
    }
}
