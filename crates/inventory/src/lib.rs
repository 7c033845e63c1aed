//! Cycle-count domain module.
//!
//! Business rules for reconciling barcode scans against an expected inventory,
//! implemented as deterministic domain logic (no IO, no HTTP, no storage).

pub mod item;
pub mod reconcile;
pub mod report;
pub mod scan;
pub mod summary;

pub use item::{InventoryItem, InventoryItemCandidate, InventoryRow};
pub use reconcile::{ScanOutcome, ScanRequest, classify, find_match, reconcile};
pub use report::{DiscrepancyReport, WrongLocationEntry};
pub use scan::{NewScan, ScanEvent, ScanStatus};
pub use summary::{CycleCountSummary, InventorySnapshot};
