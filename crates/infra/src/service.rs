//! Cycle-count application service.
//!
//! One method per HTTP operation. Handlers stay thin: they decode the request,
//! call in here, and map [`ServiceError`] onto a status code.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use cyclecount_core::DomainError;
use cyclecount_inventory::{
    CycleCountSummary, DiscrepancyReport, ScanEvent, ScanOutcome, ScanRequest, reconcile,
};

use crate::ingest::{IngestError, parse_upload};
use crate::report::{ReportError, render_workbook, report_file_name};
use crate::store::{CycleCountStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Report(#[from] ReportError),

    /// A blocking worker panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct ExportedReport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct CycleCountService<S> {
    store: S,
}

impl<S> CycleCountService<S>
where
    S: CycleCountStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn initialize(&self) -> ServiceResult<()> {
        self.store.init_schema().await?;
        info!("schema initialized");
        Ok(())
    }

    pub async fn health(&self) -> ServiceResult<()> {
        Ok(self.store.ping().await?)
    }

    /// Replace the inventory baseline with the rows of an uploaded file.
    /// The scan ledger is purged as part of the replacement.
    pub async fn import_inventory(&self, file_name: String, bytes: Vec<u8>) -> ServiceResult<ImportSummary> {
        let upload_bytes = bytes.len();
        let parsed = tokio::task::spawn_blocking(move || parse_upload(&file_name, &bytes))
            .await
            .map_err(|e| ServiceError::Task(e.to_string()))??;

        let skipped = parsed.skipped;
        let imported = self.store.replace_inventory(parsed.items).await?;

        info!(upload_bytes, imported, skipped, "inventory replaced");
        Ok(ImportSummary { imported, skipped })
    }

    /// Classify a scan against the current baseline and append it to the ledger.
    pub async fn record_scan(&self, barcode: &str, location: Option<&str>) -> ServiceResult<(ScanOutcome, ScanEvent)> {
        let request = ScanRequest::new(barcode, location)?;
        let item = self.store.find_by_barcode(request.barcode()).await?;

        let outcome = reconcile(&request, item.as_ref());
        let event = self.store.append_scan(outcome.to_new_scan()).await?;

        info!(
            barcode = %outcome.barcode,
            status = %outcome.status,
            matched = outcome.matched(),
            "scan recorded"
        );
        Ok((outcome, event))
    }

    pub async fn summary(&self) -> ServiceResult<CycleCountSummary> {
        let summary = self.store.snapshot().await?.summary();
        info!(?summary, "summary computed");
        Ok(summary)
    }

    pub async fn report(&self) -> ServiceResult<DiscrepancyReport> {
        let snapshot = self.store.snapshot().await?;
        Ok(DiscrepancyReport::from_snapshot(&snapshot))
    }

    pub async fn export_report(&self, now: DateTime<Utc>) -> ServiceResult<ExportedReport> {
        let report = self.report().await?;
        let bytes = tokio::task::spawn_blocking(move || render_workbook(&report, now))
            .await
            .map_err(|e| ServiceError::Task(e.to_string()))??;

        let file_name = report_file_name(now);
        info!(%file_name, size = bytes.len(), "report exported");
        Ok(ExportedReport { file_name, bytes })
    }

    /// Clear the scan ledger; the baseline stays.
    pub async fn reset_scans(&self) -> ServiceResult<u64> {
        let removed = self.store.clear_scans().await?;
        info!(removed, "scan ledger reset");
        Ok(removed)
    }
}
