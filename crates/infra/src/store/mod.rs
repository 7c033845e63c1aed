//! Inventory baseline + scan ledger storage boundary.
//!
//! The two collections are independent, but scans reference items by id, so
//! every operation that purges items purges the ledger first in the same unit
//! of work.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use thiserror::Error;

use cyclecount_core::DomainError;
use cyclecount_inventory::{InventoryItem, InventoryItemCandidate, InventorySnapshot, NewScan, ScanEvent};

pub use in_memory::InMemoryCycleCountStore;
pub use postgres::PostgresCycleCountStore;

/// Store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store cannot be reached (pool closed/timed out, IO, TLS, config).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A statement failed.
    #[error("query failed: {0}")]
    Query(String),

    /// A persisted row does not satisfy domain invariants.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl From<DomainError> for StoreError {
    fn from(err: DomainError) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

/// Map sqlx errors onto store errors.
///
/// | sqlx error | StoreError |
/// |---|---|
/// | `PoolTimedOut`, `PoolClosed`, `Io`, `Tls`, `Configuration` | `Unavailable` |
/// | `Database`, `RowNotFound`, `ColumnNotFound`, decode errors, other | `Query` |
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("timed out acquiring a connection in {operation}"))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {operation}: {e}")),
        sqlx::Error::Tls(e) => StoreError::Unavailable(format!("tls error in {operation}: {e}")),
        sqlx::Error::Configuration(e) => {
            StoreError::Unavailable(format!("bad database configuration in {operation}: {e}"))
        }
        sqlx::Error::Database(db_err) => StoreError::Query(format!(
            "database error in {operation}: {}",
            db_err.message()
        )),
        other => StoreError::Query(format!("sqlx error in {operation}: {other}")),
    }
}

/// Storage for the expected inventory and the scan ledger.
///
/// ## Implementation requirements
///
/// - `replace_inventory` is all-or-nothing: scans and items are purged and the
///   new items written as one unit.
/// - `find_by_barcode` matches either identifier exactly; on duplicates the
///   lowest id wins.
/// - `snapshot` returns both collections as of one point in time.
#[async_trait::async_trait]
pub trait CycleCountStore: Send + Sync {
    /// Create tables and indexes if absent.
    async fn init_schema(&self) -> Result<(), StoreError>;

    /// Verify the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Purge scans and items, then insert `items`. Returns the number inserted.
    async fn replace_inventory(&self, items: Vec<InventoryItemCandidate>) -> Result<usize, StoreError>;

    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<InventoryItem>, StoreError>;

    /// Append one ledger entry.
    async fn append_scan(&self, scan: NewScan) -> Result<ScanEvent, StoreError>;

    /// Purge the ledger, keeping inventory. Returns the number of scans removed.
    async fn clear_scans(&self) -> Result<u64, StoreError>;

    async fn snapshot(&self) -> Result<InventorySnapshot, StoreError>;
}

#[async_trait::async_trait]
impl<S> CycleCountStore for Arc<S>
where
    S: CycleCountStore + ?Sized,
{
    async fn init_schema(&self) -> Result<(), StoreError> {
        (**self).init_schema().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }

    async fn replace_inventory(&self, items: Vec<InventoryItemCandidate>) -> Result<usize, StoreError> {
        (**self).replace_inventory(items).await
    }

    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<InventoryItem>, StoreError> {
        (**self).find_by_barcode(barcode).await
    }

    async fn append_scan(&self, scan: NewScan) -> Result<ScanEvent, StoreError> {
        (**self).append_scan(scan).await
    }

    async fn clear_scans(&self) -> Result<u64, StoreError> {
        (**self).clear_scans().await
    }

    async fn snapshot(&self) -> Result<InventorySnapshot, StoreError> {
        (**self).snapshot().await
    }
}
