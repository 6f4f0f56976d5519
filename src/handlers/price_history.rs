//! GPU price history handler
//!
//! GET /api/gpus/{id}/price_histories

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::handlers::{catalog_error, ApiError};
use crate::models::price_history::{PriceHistoryQuery, PricePointEntry};
use crate::services::price_history;
use crate::AppState;

/// GET /api/gpus/{id}/price_histories
///
/// # Query Parameters
/// - `days`: window size (default 30, capped at 365)
///
/// # Response
/// - 200: `[{ "date": "YYYY-MM-DD", "price": 89800 }, ...]`, oldest first
/// - 404: unknown gpu
pub async fn get_price_histories(
    State(state): State<AppState>,
    Path(gpu_id): Path<i32>,
    Query(query): Query<PriceHistoryQuery>,
) -> Result<Json<Vec<PricePointEntry>>, ApiError> {
    let days = query.window_days();

    let points = price_history::price_trend(&state.db, gpu_id, days)
        .await
        .map_err(catalog_error)?;

    info!(gpu_id, days, count = points.len(), "Price history query completed");

    Ok(Json(points.into_iter().map(PricePointEntry::from).collect()))
}
