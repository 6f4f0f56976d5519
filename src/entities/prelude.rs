//! `SeaORM` Entity prelude

pub use super::favorites::Entity as Favorites;
pub use super::gpus::Entity as Gpus;
pub use super::price_histories::Entity as PriceHistories;
pub use super::sync_status::Entity as SyncStatus;
