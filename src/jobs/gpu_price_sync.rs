//! Daily GPU price sweep
//!
//! Walks every gpu with an ASIN, one at a time, asks the price source for a
//! quote and appends a price history row when a price comes back. A failure
//! on one gpu is logged and collected; the sweep always moves on.

use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use thiserror::Error;
use tokio::time::{interval, Duration};

use crate::entities::{gpus, prelude::Gpus};
use crate::jobs::pacing::Pacer;
use crate::services::paapi_client::{PaapiError, PriceSource};
use crate::services::price_history::{self, PriceHistoryError};
use crate::services::sync_status::{self, intervals, jobs};

/// Error raised while processing a single gpu
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Source(#[from] PaapiError),
    #[error(transparent)]
    PriceHistory(#[from] PriceHistoryError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Recorded { price: i32 },
    NoPrice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepFailure {
    pub gpu_id: i32,
    pub gpu_name: String,
    pub error: String,
}

/// Summary of one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Gpus with an ASIN
    pub eligible: usize,
    pub recorded: usize,
    /// No result or no price
    pub skipped: usize,
    pub failures: Vec<SweepFailure>,
}

/// Start the daily price sync background job
///
/// Wakes hourly and sweeps when the last successful sweep is a day old.
/// Sweeps run inside this single task, so two never overlap.
pub async fn start_gpu_price_sync_job<S, P>(db: DatabaseConnection, source: S, pacer: P)
where
    S: PriceSource + 'static,
    P: Pacer + 'static,
{
    tokio::spawn(async move {
        let mut interval = interval(Duration::from_secs(3600)); // Check every hour

        loop {
            interval.tick().await;

            match sync_status::should_sync(&db, jobs::GPU_PRICE_SYNC).await {
                Ok(true) => {
                    tracing::info!("Starting scheduled GPU price sweep");
                    run_scheduled_sweep(&db, &source, &pacer).await;
                }
                Ok(false) => {
                    tracing::debug!("Skipping GPU price sweep (recently synced)");
                }
                Err(e) => {
                    tracing::warn!("Failed to check sync status: {}", e);
                }
            }
        }
    });
}

async fn run_scheduled_sweep<S, P>(db: &DatabaseConnection, source: &S, pacer: &P)
where
    S: PriceSource + ?Sized,
    P: Pacer + ?Sized,
{
    match run_price_sweep(db, source, pacer).await {
        Ok(report) => {
            if let Err(e) =
                sync_status::record_success(db, jobs::GPU_PRICE_SYNC, intervals::GPU_PRICE_SYNC).await
            {
                tracing::warn!("Failed to record sync success: {}", e);
            }
            tracing::info!(
                recorded = report.recorded,
                failed = report.failures.len(),
                "Scheduled GPU price sweep finished"
            );
        }
        Err(e) => {
            tracing::error!("GPU price sweep could not start: {}", e);
            if let Err(e2) = sync_status::record_failure(
                db,
                jobs::GPU_PRICE_SYNC,
                &e.to_string(),
                intervals::GPU_PRICE_SYNC,
            )
            .await
            {
                tracing::warn!("Failed to record sync failure: {}", e2);
            }
        }
    }
}

/// Perform one full sweep over every gpu that has an ASIN.
///
/// Only loading the gpu list can fail the sweep; per-gpu errors end up in
/// `SweepReport::failures`. `pacer` is awaited between consecutive gpus
/// whatever the previous gpu's outcome was.
pub async fn run_price_sweep<S, P>(
    db: &DatabaseConnection,
    source: &S,
    pacer: &P,
) -> Result<SweepReport, DbErr>
where
    S: PriceSource + ?Sized,
    P: Pacer + ?Sized,
{
    let targets = Gpus::find()
        .filter(gpus::Column::AmazonAsin.is_not_null())
        .order_by_asc(gpus::Column::Id)
        .all(db)
        .await?;

    let mut report = SweepReport {
        eligible: targets.len(),
        ..Default::default()
    };

    tracing::info!("Sweeping prices for {} gpus", targets.len());

    for (idx, gpu) in targets.iter().enumerate() {
        if idx > 0 {
            pacer.pause().await;
        }

        match process_gpu(db, source, gpu).await {
            Ok(ItemOutcome::Recorded { price }) => {
                report.recorded += 1;
                tracing::debug!(gpu_id = gpu.id, price, "Price recorded");
            }
            Ok(ItemOutcome::NoPrice) => {
                report.skipped += 1;
                tracing::debug!(gpu_id = gpu.id, "No price available, skipping");
            }
            Err(e) => {
                tracing::error!(
                    gpu_id = gpu.id,
                    gpu_name = %gpu.name,
                    error = %e,
                    "Failed to fetch GPU price"
                );
                report.failures.push(SweepFailure {
                    gpu_id: gpu.id,
                    gpu_name: gpu.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        eligible = report.eligible,
        recorded = report.recorded,
        skipped = report.skipped,
        failed = report.failures.len(),
        "GPU price sweep complete"
    );

    Ok(report)
}

async fn process_gpu<S>(
    db: &DatabaseConnection,
    source: &S,
    gpu: &gpus::Model,
) -> Result<ItemOutcome, IngestError>
where
    S: PriceSource + ?Sized,
{
    let Some(asin) = gpu.amazon_asin.as_deref() else {
        return Ok(ItemOutcome::NoPrice);
    };

    let Some(lookup) = source.fetch_price(asin).await? else {
        return Ok(ItemOutcome::NoPrice);
    };

    let Some(price) = lookup.price else {
        return Ok(ItemOutcome::NoPrice);
    };

    let image_url = lookup.image_url.as_deref().filter(|url| !url.trim().is_empty());
    let point =
        price_history::record_price_observation(db, gpu.id, price, image_url, Utc::now()).await?;

    Ok(ItemOutcome::Recorded { price: point.price })
}
