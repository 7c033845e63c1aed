//! Postgres-backed store.
//!
//! ## Atomicity
//!
//! `replace_inventory` purges and re-inserts inside one transaction; a failure
//! part-way leaves the previous baseline and ledger intact. `snapshot` reads
//! both tables inside one `REPEATABLE READ` transaction so the counts it feeds
//! agree with each other.
//!
//! Scans arriving while an ingestion is in flight are not coordinated with it:
//! they land either before the purge (and are purged) or after the commit.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{Span, instrument};

use cyclecount_core::{InventoryItemId, ScanId};
use cyclecount_inventory::{
    InventoryItem, InventoryItemCandidate, InventorySnapshot, NewScan, ScanEvent, ScanStatus,
};

use crate::db::schema;

use super::{CycleCountStore, StoreError, map_sqlx_error};

/// Rows per multi-row INSERT (4 binds each, well under the 65535 bind limit).
const INSERT_CHUNK: usize = 1_000;

#[derive(Debug, Clone)]
pub struct PostgresCycleCountStore {
    pool: PgPool,
}

impl PostgresCycleCountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct InventoryRowRecord {
    id: i64,
    instrument_number: Option<String>,
    manufacturer_serial: Option<String>,
    description: String,
    location: String,
    created_at: DateTime<Utc>,
}

impl From<InventoryRowRecord> for InventoryItem {
    fn from(row: InventoryRowRecord) -> Self {
        InventoryItem {
            id: InventoryItemId::new(row.id),
            instrument_number: row.instrument_number,
            manufacturer_serial: row.manufacturer_serial,
            description: row.description,
            location: row.location,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ScanRowRecord {
    id: i64,
    barcode: String,
    matched: bool,
    inventory_id: Option<i64>,
    expected_location: Option<String>,
    actual_location: Option<String>,
    status: String,
    scanned_at: DateTime<Utc>,
}

impl TryFrom<ScanRowRecord> for ScanEvent {
    type Error = StoreError;

    fn try_from(row: ScanRowRecord) -> Result<Self, Self::Error> {
        let status: ScanStatus = row.status.parse()?;
        Ok(ScanEvent::restore(
            ScanId::new(row.id),
            row.barcode,
            row.matched,
            row.inventory_id.map(InventoryItemId::new),
            row.expected_location,
            row.actual_location,
            status,
            row.scanned_at,
        )?)
    }
}

// Column lists normalize tables created by earlier deployments (`SERIAL` ids,
// nullable text/flag columns, `TIMESTAMP` without zone) to the record types.
const INVENTORY_COLUMNS: &str = r#"
    id::BIGINT AS id,
    instrument_number,
    manufacturer_serial,
    COALESCE(description, '') AS description,
    COALESCE(location, '') AS location,
    COALESCE(created_at::TIMESTAMPTZ, NOW()) AS created_at
"#;

const SCAN_COLUMNS: &str = r#"
    id::BIGINT AS id,
    barcode,
    COALESCE(matched, inventory_id IS NOT NULL) AS matched,
    inventory_id::BIGINT AS inventory_id,
    expected_location,
    actual_location,
    COALESCE(status, CASE WHEN inventory_id IS NULL THEN 'OVERAGE' ELSE 'FOUND' END) AS status,
    COALESCE(scanned_at::TIMESTAMPTZ, NOW()) AS scanned_at
"#;

#[async_trait::async_trait]
impl CycleCountStore for PostgresCycleCountStore {
    #[instrument(skip(self), err)]
    async fn init_schema(&self) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        for statement in schema::statements() {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("init_schema", e))?;
        }

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))
    }

    #[instrument(skip(self), err)]
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| map_sqlx_error("ping", e))
    }

    #[instrument(
        skip(self, items),
        fields(item_count = items.len(), purged_scans = tracing::field::Empty),
        err
    )]
    async fn replace_inventory(&self, items: Vec<InventoryItemCandidate>) -> Result<usize, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        // Ledger first: scans reference inventory rows.
        let purged_scans = sqlx::query("DELETE FROM scans")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("purge_scans", e))?
            .rows_affected();
        sqlx::query("DELETE FROM inventory")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("purge_inventory", e))?;

        let mut inserted = 0usize;
        for chunk in items.chunks(INSERT_CHUNK) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO inventory (instrument_number, manufacturer_serial, description, location) ",
            );
            builder.push_values(chunk, |mut row, item| {
                row.push_bind(item.instrument_number())
                    .push_bind(item.manufacturer_serial())
                    .push_bind(item.description())
                    .push_bind(item.location());
            });
            let result = builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("insert_inventory", e))?;
            inserted += result.rows_affected() as usize;
        }

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;

        Span::current().record("purged_scans", purged_scans);
        Ok(inserted)
    }

    #[instrument(skip(self), err)]
    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<InventoryItem>, StoreError> {
        let query = format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory \
             WHERE instrument_number = $1 OR manufacturer_serial = $1 \
             ORDER BY id ASC LIMIT 1"
        );
        let row: Option<InventoryRowRecord> = sqlx::query_as(&query)
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_barcode", e))?;

        Ok(row.map(InventoryItem::from))
    }

    #[instrument(skip(self, scan), fields(status = %scan.status()), err)]
    async fn append_scan(&self, scan: NewScan) -> Result<ScanEvent, StoreError> {
        let query = format!(
            "INSERT INTO scans (barcode, matched, inventory_id, expected_location, actual_location, status) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {SCAN_COLUMNS}"
        );
        let row: ScanRowRecord = sqlx::query_as(&query)
            .bind(scan.barcode())
            .bind(scan.matched())
            .bind(scan.inventory_item_id().map(i64::from))
            .bind(scan.expected_location())
            .bind(scan.actual_location())
            .bind(scan.status().as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("append_scan", e))?;

        row.try_into()
    }

    #[instrument(skip(self), err)]
    async fn clear_scans(&self) -> Result<u64, StoreError> {
        sqlx::query("DELETE FROM scans")
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| map_sqlx_error("clear_scans", e))
    }

    #[instrument(skip(self), err)]
    async fn snapshot(&self) -> Result<InventorySnapshot, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("set_isolation", e))?;

        let items: Vec<InventoryRowRecord> =
            sqlx::query_as(&format!("SELECT {INVENTORY_COLUMNS} FROM inventory ORDER BY id ASC"))
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("load_inventory", e))?;
        let scans: Vec<ScanRowRecord> =
            sqlx::query_as(&format!("SELECT {SCAN_COLUMNS} FROM scans ORDER BY id ASC"))
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("load_scans", e))?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;

        let items = items.into_iter().map(InventoryItem::from).collect();
        let scans = scans
            .into_iter()
            .map(ScanEvent::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(InventorySnapshot::new(items, scans))
    }
}
