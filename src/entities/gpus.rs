//! SeaORM Entity for tracked GPUs
//!
//! `current_price` is denormalized from the newest price history row and is
//! only written through `services::price_history::record_price_point`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "gpus")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Board partner + model, e.g. "ASUS TUF Gaming NVIDIA RTX 4070"
    #[sea_orm(unique)]
    pub name: String,
    /// Chip vendor: NVIDIA, AMD, Intel
    pub manufacturer: Option<String>,
    /// Chip series, e.g. "RTX 4070"
    pub series: Option<String>,
    /// VRAM in GB
    pub vram: Option<i32>,
    pub benchmark_score: Option<i32>,
    pub image_url: Option<String>,
    /// Marketplace product id used against the price API
    #[sea_orm(unique)]
    pub amazon_asin: Option<String>,
    /// Price of the most recent price history row (0 when none)
    pub current_price: i32,
    /// Favorite counter, never below 0
    pub popularity: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::price_histories::Entity")]
    PriceHistories,
    #[sea_orm(has_many = "super::favorites::Entity")]
    Favorites,
}

impl Related<super::price_histories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceHistories.def()
    }
}

impl Related<super::favorites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
