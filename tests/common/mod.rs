#![allow(dead_code)]

use chrono::{DateTime, Utc};
use gpu_price_tracker::entities::gpus;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::MigratorTrait;

/// Fresh in-memory SQLite database with all migrations applied
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // One connection, otherwise every pooled connection gets its own empty database
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Builder for catalog rows used across tests
#[derive(Debug, Clone)]
pub struct GpuSeed {
    pub name: String,
    pub manufacturer: Option<String>,
    pub series: Option<String>,
    pub benchmark_score: Option<i32>,
    pub amazon_asin: Option<String>,
    pub image_url: Option<String>,
    pub current_price: i32,
    pub popularity: i32,
}

impl GpuSeed {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            manufacturer: None,
            series: None,
            benchmark_score: None,
            amazon_asin: None,
            image_url: None,
            current_price: 0,
            popularity: 0,
        }
    }

    pub fn manufacturer(mut self, manufacturer: &str) -> Self {
        self.manufacturer = Some(manufacturer.to_string());
        self
    }

    pub fn series(mut self, series: &str) -> Self {
        self.series = Some(series.to_string());
        self
    }

    pub fn score(mut self, score: i32) -> Self {
        self.benchmark_score = Some(score);
        self
    }

    pub fn asin(mut self, asin: &str) -> Self {
        self.amazon_asin = Some(asin.to_string());
        self
    }

    pub fn image(mut self, url: &str) -> Self {
        self.image_url = Some(url.to_string());
        self
    }

    pub fn price(mut self, price: i32) -> Self {
        self.current_price = price;
        self
    }

    pub fn popularity(mut self, popularity: i32) -> Self {
        self.popularity = popularity;
        self
    }

    pub async fn insert(self, db: &DatabaseConnection) -> gpus::Model {
        let now = Utc::now().fixed_offset();
        gpus::ActiveModel {
            name: Set(self.name),
            manufacturer: Set(self.manufacturer),
            series: Set(self.series),
            vram: Set(Some(12)),
            benchmark_score: Set(self.benchmark_score),
            image_url: Set(self.image_url),
            amazon_asin: Set(self.amazon_asin),
            current_price: Set(self.current_price),
            popularity: Set(self.popularity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert gpu")
    }
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - chrono::Duration::days(days)
}
