//! Store selection and service wiring.

use std::sync::Arc;

use cyclecount_infra::{
    CycleCountService, CycleCountStore, InMemoryCycleCountStore, PostgresCycleCountStore,
    StoreBackend, db,
};

/// The service as handlers see it: backend erased behind the store trait.
pub type AppServices = CycleCountService<Arc<dyn CycleCountStore>>;

/// Build services for the configured backend.
///
/// The Postgres pool connects lazily, so an unreachable database shows up
/// as 503s on requests rather than a startup failure.
pub fn build_services(backend: &StoreBackend) -> anyhow::Result<AppServices> {
    let store: Arc<dyn CycleCountStore> = match backend {
        StoreBackend::InMemory => {
            tracing::info!("using in-memory store");
            Arc::new(InMemoryCycleCountStore::new())
        }
        StoreBackend::Postgres(config) => {
            tracing::info!(
                max_connections = config.max_connections,
                acquire_timeout_secs = config.acquire_timeout.as_secs(),
                "using postgres store"
            );
            let pool = db::create_pool(config)?;
            Arc::new(PostgresCycleCountStore::new(pool))
        }
    };

    Ok(CycleCountService::new(store))
}

/// In-memory services, for tests and local runs.
pub fn in_memory() -> AppServices {
    CycleCountService::new(Arc::new(InMemoryCycleCountStore::new()))
}
