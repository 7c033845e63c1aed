use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Multipart},
};

use crate::app::dto::UploadResponse;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

/// Multipart field carrying the inventory file.
const FILE_FIELD: &str = "file";

/// Replace the inventory baseline with an uploaded CSV or spreadsheet.
pub async fn upload(
    Extension(services): Extension<Arc<AppServices>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    // Exceeding the body limit surfaces here as a multipart error (413).
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().trim().to_string();
        if file_name.is_empty() {
            return Err(ApiError::validation("No file selected"));
        }

        let bytes = field.bytes().await?;

        let summary = services.import_inventory(file_name, bytes.to_vec()).await?;
        return Ok(Json(UploadResponse::loaded(summary.imported, summary.skipped)));
    }

    Err(ApiError::validation("No file provided"))
}
