//! Price history write path and trend reads
//!
//! `record_price_point` is the only code that changes `gpus.current_price`:
//! the history row and the denormalized price are written in one
//! transaction.

use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use thiserror::Error;

use crate::entities::{gpus, price_histories, prelude::PriceHistories};
use crate::services::catalog::{self, CatalogError};

/// Default trend window in days
pub const DEFAULT_TREND_DAYS: i64 = 30;
/// Longest trend window served
pub const MAX_TREND_DAYS: i64 = 365;

#[derive(Debug, Error)]
pub enum PriceHistoryError {
    #[error("price {0} is outside the storable range")]
    InvalidPrice(i64),
    #[error("gpu {0} not found")]
    GpuNotFound(i32),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CatalogError> for PriceHistoryError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => PriceHistoryError::GpuNotFound(id),
            CatalogError::Database(e) => PriceHistoryError::Database(e),
        }
    }
}

/// Append a price observation and make it the gpu's current price.
pub async fn record_price_point(
    db: &DatabaseConnection,
    gpu_id: i32,
    price: i64,
    recorded_at: DateTime<Utc>,
) -> Result<price_histories::Model, PriceHistoryError> {
    record_price_observation(db, gpu_id, price, None, recorded_at).await
}

/// Like `record_price_point`, also replacing the image url when one is given.
///
/// Point, price and image commit together or not at all.
pub async fn record_price_observation(
    db: &DatabaseConnection,
    gpu_id: i32,
    price: i64,
    image_url: Option<&str>,
    recorded_at: DateTime<Utc>,
) -> Result<price_histories::Model, PriceHistoryError> {
    let stored_price = i32::try_from(price)
        .ok()
        .filter(|p| *p >= 0)
        .ok_or(PriceHistoryError::InvalidPrice(price))?;

    let txn = db.begin().await?;

    let gpu = catalog::find_gpu(&txn, gpu_id).await?;
    let now = Utc::now().fixed_offset();

    let point = price_histories::ActiveModel {
        gpu_id: Set(gpu_id),
        price: Set(stored_price),
        recorded_at: Set(recorded_at.fixed_offset()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut active_gpu: gpus::ActiveModel = gpu.into();
    active_gpu.current_price = Set(stored_price);
    active_gpu.updated_at = Set(now);
    active_gpu.update(&txn).await?;

    if let Some(url) = image_url {
        catalog::update_image_url(&txn, gpu_id, url).await?;
    }

    txn.commit().await?;

    tracing::debug!(gpu_id, price = stored_price, "Recorded price point");

    Ok(point)
}

/// Clamp a requested window to `0..=MAX_TREND_DAYS`.
pub fn clamp_trend_days(days: i64) -> i64 {
    days.clamp(0, MAX_TREND_DAYS)
}

/// Points recorded within the last `days` days, oldest first.
pub async fn price_trend(
    db: &DatabaseConnection,
    gpu_id: i32,
    days: i64,
) -> Result<Vec<price_histories::Model>, CatalogError> {
    // 404 for unknown gpus rather than an empty series
    catalog::find_gpu(db, gpu_id).await?;

    let since = (Utc::now() - Duration::days(clamp_trend_days(days))).fixed_offset();

    let points = PriceHistories::find()
        .filter(price_histories::Column::GpuId.eq(gpu_id))
        .filter(price_histories::Column::RecordedAt.gte(since))
        .order_by(price_histories::Column::RecordedAt, Order::Asc)
        .order_by(price_histories::Column::Id, Order::Asc)
        .all(db)
        .await?;

    Ok(points)
}
