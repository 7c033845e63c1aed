use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use cyclecount_infra::report::XLSX_CONTENT_TYPE;
use cyclecount_inventory::CycleCountSummary;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn stats(Extension(services): Extension<Arc<AppServices>>) -> Result<Json<CycleCountSummary>, ApiError> {
    Ok(Json(services.summary().await?))
}

/// Download the discrepancy workbook.
pub async fn export(Extension(services): Extension<Arc<AppServices>>) -> Result<Response, ApiError> {
    let exported = services.export_report(Utc::now()).await?;
    let disposition = format!("attachment; filename=\"{}\"", exported.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        exported.bytes,
    )
        .into_response())
}
