pub mod gpu;
pub mod price_history;
pub mod viewer;

use axum::{http::StatusCode, Json};

use crate::models::ErrorResponse;
use crate::services::catalog::CatalogError;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a catalog error to an HTTP status and body
pub(crate) fn catalog_error(err: CatalogError) -> ApiError {
    match err {
        CatalogError::NotFound(id) => {
            tracing::warn!(gpu_id = id, "GPU not found");
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "GPU not found".to_string(),
                    code: Some("GPU_NOT_FOUND".to_string()),
                }),
            )
        }
        CatalogError::Database(e) => {
            tracing::error!(error = %e, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Database error: {}", e),
                    code: Some("DATABASE_ERROR".to_string()),
                }),
            )
        }
    }
}

pub async fn health() -> &'static str {
    "ok"
}
