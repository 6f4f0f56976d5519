//! Favorites persistence
//!
//! Favorite rows are written here and every add/remove drives the catalog's
//! popularity port inside the same transaction.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
    Set, TransactionTrait,
};

use crate::entities::{favorites, prelude::Favorites};
use crate::services::catalog::{self, CatalogError};

/// Gpu ids the user has favorited.
pub async fn favorited_gpu_ids(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<HashSet<i32>, CatalogError> {
    let ids: Vec<i32> = Favorites::find()
        .select_only()
        .column(favorites::Column::GpuId)
        .filter(favorites::Column::UserId.eq(user_id))
        .into_tuple()
        .all(db)
        .await?;

    Ok(ids.into_iter().collect())
}

pub async fn is_favorited(
    db: &DatabaseConnection,
    user_id: i64,
    gpu_id: i32,
) -> Result<bool, CatalogError> {
    let found = Favorites::find()
        .filter(favorites::Column::UserId.eq(user_id))
        .filter(favorites::Column::GpuId.eq(gpu_id))
        .one(db)
        .await?;

    Ok(found.is_some())
}

/// Returns `false` when the favorite already existed.
pub async fn add_favorite(
    db: &DatabaseConnection,
    user_id: i64,
    gpu_id: i32,
) -> Result<bool, CatalogError> {
    let txn = db.begin().await?;

    catalog::find_gpu(&txn, gpu_id).await?;

    let existing = Favorites::find()
        .filter(favorites::Column::UserId.eq(user_id))
        .filter(favorites::Column::GpuId.eq(gpu_id))
        .one(&txn)
        .await?;

    if existing.is_some() {
        return Ok(false);
    }

    favorites::ActiveModel {
        user_id: Set(user_id),
        gpu_id: Set(gpu_id),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    catalog::on_favorite_added(&txn, gpu_id).await?;
    txn.commit().await?;

    tracing::debug!(user_id, gpu_id, "Favorite added");
    Ok(true)
}

/// Returns `false` when there was nothing to remove.
pub async fn remove_favorite(
    db: &DatabaseConnection,
    user_id: i64,
    gpu_id: i32,
) -> Result<bool, CatalogError> {
    let txn = db.begin().await?;

    let deleted = Favorites::delete_many()
        .filter(favorites::Column::UserId.eq(user_id))
        .filter(favorites::Column::GpuId.eq(gpu_id))
        .exec(&txn)
        .await?;

    if deleted.rows_affected == 0 {
        return Ok(false);
    }

    catalog::on_favorite_removed(&txn, gpu_id).await?;
    txn.commit().await?;

    tracing::debug!(user_id, gpu_id, "Favorite removed");
    Ok(true)
}
