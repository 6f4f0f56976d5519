// src/lib.rs

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

pub mod entities {
    pub mod prelude;
    pub mod favorites;
    pub mod gpus;
    pub mod price_histories;
    pub mod sync_status;
}

pub mod services {
    pub mod catalog;
    pub mod favorites;
    pub mod paapi_client;
    pub mod price_history;
    pub mod request_signer;
    pub mod sync_status;
}

pub mod config;
pub mod handlers;
pub mod jobs;
pub mod models;

/// Catalog read API
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/gpus", get(handlers::gpu::list_gpus))
        .route("/api/gpus/{id}", get(handlers::gpu::get_gpu))
        .route(
            "/api/gpus/{id}/price_histories",
            get(handlers::price_history::get_price_histories),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
