use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::dto::{HealthResponse, MessageResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.health().await {
        Ok(()) => Json(HealthResponse::healthy()).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(HealthResponse::unhealthy(e.to_string()))).into_response()
        }
    }
}

pub async fn init(Extension(services): Extension<Arc<AppServices>>) -> Result<Json<MessageResponse>, ApiError> {
    services.initialize().await?;
    Ok(Json(MessageResponse::ok("Database initialized successfully")))
}
