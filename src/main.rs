use gpu_price_tracker::config::{PaapiConfig, ServerConfig};
use gpu_price_tracker::jobs::{gpu_price_sync, pacing::FixedIntervalPacer};
use gpu_price_tracker::services::paapi_client::PaapiClient;
use gpu_price_tracker::{build_router, AppState};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gpu_price_tracker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let server_config = ServerConfig::from_env()?;
    // Missing API secrets stop startup before anything is served
    let paapi_config = PaapiConfig::from_env()?;
    tracing::info!(?paapi_config, "Loaded PA-API configuration");

    // Connect to database
    tracing::info!("Connecting to database...");
    let db = Database::connect(&server_config.database_url).await?;

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None).await?;

    // Start background jobs
    let client = PaapiClient::new(&paapi_config)?;
    let pacer = FixedIntervalPacer::new(paapi_config.pacing_interval);
    tracing::info!(pacing = ?pacer.interval(), "Starting GPU price sync job");
    gpu_price_sync::start_gpu_price_sync_job(db.clone(), client, pacer).await;

    let app = build_router(AppState { db });

    // Start server
    let listener = tokio::net::TcpListener::bind(&server_config.bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
