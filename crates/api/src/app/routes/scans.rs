use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
};

use crate::app::dto::{MessageResponse, ScanRequestBody, ScanResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn scan(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ScanRequestBody>, JsonRejection>,
) -> Result<Json<ScanResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::validation(e.body_text()))?;

    let barcode = body.barcode.unwrap_or_default();
    let (outcome, _event) = services.record_scan(&barcode, body.location.as_deref()).await?;

    Ok(Json(outcome.into()))
}

/// Clear the scan ledger, keeping the inventory baseline.
pub async fn reset(Extension(services): Extension<Arc<AppServices>>) -> Result<Json<MessageResponse>, ApiError> {
    services.reset_scans().await?;
    Ok(Json(MessageResponse::ok("Scan data reset successfully")))
}
