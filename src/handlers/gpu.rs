//! GPU catalog handlers
//!
//! GET /api/gpus and GET /api/gpus/{id}

use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::handlers::{catalog_error, viewer::Viewer, ApiError};
use crate::models::gpu::{GpuEntry, GpuListQuery, GpuListResponse, PaginationMeta};
use crate::services::{catalog, favorites};
use crate::AppState;

/// GET /api/gpus
///
/// # Query Parameters
/// - `q`: keyword matched against name or series
/// - `manufacturer`: exact manufacturer
/// - `price_min` / `price_max`: inclusive bounds on the current price
/// - `sort`: price_asc, price_desc, performance, cost_performance, name,
///   popularity (default; unknown values fall back to it)
/// - `page`: 1-based, 15 items per page
///
/// # Response
/// - 200: `{ "items": [...], "meta": { current_page, total_pages, total_count, per_page } }`
/// - 500: Database error
pub async fn list_gpus(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(query): Query<GpuListQuery>,
) -> Result<Json<GpuListResponse>, ApiError> {
    let catalog_query = query.to_catalog_query();

    info!(
        q = ?catalog_query.keyword,
        manufacturer = ?catalog_query.manufacturer,
        sort = catalog_query.sort.as_str(),
        page = catalog_query.page,
        "GPU list request received"
    );

    let page = catalog::list_gpus(&state.db, &catalog_query)
        .await
        .map_err(catalog_error)?;

    let favorite_ids = match viewer.user_id() {
        Some(user_id) => favorites::favorited_gpu_ids(&state.db, user_id)
            .await
            .map_err(catalog_error)?,
        None => HashSet::new(),
    };

    let meta = PaginationMeta::from(&page);
    let items = page
        .gpus
        .into_iter()
        .map(|gpu| {
            let favorited = favorite_ids.contains(&gpu.id);
            GpuEntry::from_model(gpu, favorited)
        })
        .collect();

    Ok(Json(GpuListResponse { items, meta }))
}

/// GET /api/gpus/{id}
///
/// # Response
/// - 200: single gpu with `cost_performance` and `favorited`
/// - 404: unknown id
pub async fn get_gpu(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(gpu_id): Path<i32>,
) -> Result<Json<GpuEntry>, ApiError> {
    let gpu = catalog::find_gpu(&state.db, gpu_id)
        .await
        .map_err(catalog_error)?;

    let favorited = match viewer.user_id() {
        Some(user_id) => favorites::is_favorited(&state.db, user_id, gpu_id)
            .await
            .map_err(catalog_error)?,
        None => false,
    };

    Ok(Json(GpuEntry::from_model(gpu, favorited)))
}
