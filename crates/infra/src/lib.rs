//! Infrastructure layer: config, Postgres wiring, stores, file ingestion and
//! report rendering, plus the service that ties them together.

pub mod config;
pub mod db;
pub mod ingest;
pub mod report;
pub mod service;
pub mod store;

pub use config::{Config, ConfigError, DatabaseConfig, StoreBackend};
pub use service::{CycleCountService, ExportedReport, ImportSummary, ServiceError, ServiceResult};
pub use store::{CycleCountStore, InMemoryCycleCountStore, PostgresCycleCountStore, StoreError};
