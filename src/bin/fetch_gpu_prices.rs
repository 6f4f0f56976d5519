//! Run one GPU price sweep and exit.
//!
//! Meant for cron or manual runs; the server's background job does the same
//! thing on its own schedule.

use std::env;

use sea_orm::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gpu_price_tracker::config::PaapiConfig;
use gpu_price_tracker::jobs::{gpu_price_sync, pacing::FixedIntervalPacer};
use gpu_price_tracker::services::paapi_client::PaapiClient;
use gpu_price_tracker::services::sync_status::{self, intervals, jobs};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gpu_price_tracker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let paapi_config = PaapiConfig::from_env()?;
    let db = Database::connect(env::var("DATABASE_URL")?).await?;

    let client = PaapiClient::new(&paapi_config)?;
    let pacer = FixedIntervalPacer::new(paapi_config.pacing_interval);

    let report = gpu_price_sync::run_price_sweep(&db, &client, &pacer).await?;
    sync_status::record_success(&db, jobs::GPU_PRICE_SYNC, intervals::GPU_PRICE_SYNC).await?;

    println!(
        "Swept {} gpus: {} recorded, {} without price, {} failed",
        report.eligible,
        report.recorded,
        report.skipped,
        report.failures.len()
    );
    for failure in &report.failures {
        println!("  ✗ [{}] {}: {}", failure.gpu_id, failure.gpu_name, failure.error);
    }

    Ok(())
}
