use axum::{
    Router,
    routing::{get, post},
};

pub mod inventory;
pub mod reports;
pub mod scans;
pub mod system;

/// All cycle-count endpoints, relative to their mount point.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/init", get(system::init).post(system::init))
        .route("/upload", post(inventory::upload))
        .route("/scan", post(scans::scan))
        .route("/reset", post(scans::reset))
        .route("/stats", get(reports::stats))
        .route("/export", get(reports::export))
}
