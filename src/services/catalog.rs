//! GPU catalog queries
//!
//! Keyword/manufacturer/price filtering, the six sort modes, fixed-size
//! pagination and the cost-performance metric shown on every item. Also
//! exposes the popularity port the favorites service drives.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    sea_query::{Expr, Func, LikeExpr, NullOrdering},
};
use thiserror::Error;
use tracing::debug;

use crate::entities::{gpus, prelude::Gpus};

/// Items per catalog page
pub const PER_PAGE: u64 = 15;

/// Display scale for benchmark-per-price
const COST_PERFORMANCE_SCALE: Decimal = dec!(10000);

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("gpu {0} not found")]
    NotFound(i32),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    PriceAsc,
    PriceDesc,
    Performance,
    CostPerformance,
    Name,
    #[default]
    Popularity,
}

impl SortMode {
    /// Unknown or missing keys fall back to popularity.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("price_asc") => SortMode::PriceAsc,
            Some("price_desc") => SortMode::PriceDesc,
            Some("performance") => SortMode::Performance,
            Some("cost_performance") => SortMode::CostPerformance,
            Some("name") => SortMode::Name,
            _ => SortMode::Popularity,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::PriceAsc => "price_asc",
            SortMode::PriceDesc => "price_desc",
            SortMode::Performance => "performance",
            SortMode::CostPerformance => "cost_performance",
            SortMode::Name => "name",
            SortMode::Popularity => "popularity",
        }
    }
}

/// Normalized catalog query; see `models::gpu::GpuListQuery` for parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub keyword: Option<String>,
    pub manufacturer: Option<String>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub sort: SortMode,
    /// 1-based
    pub page: u64,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            manufacturer: None,
            price_min: None,
            price_max: None,
            sort: SortMode::default(),
            page: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub gpus: Vec<gpus::Model>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub per_page: u64,
}

/// round(benchmark / price * 10000, 2), or 0.0 unless both are positive.
pub fn cost_performance(current_price: i32, benchmark_score: Option<i32>) -> f64 {
    match benchmark_score {
        Some(score) if current_price > 0 && score > 0 => {
            let ratio = Decimal::from(score) / Decimal::from(current_price) * COST_PERFORMANCE_SCALE;
            ratio
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                .to_f64()
                .unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

pub fn total_pages(total_count: u64, per_page: u64) -> u64 {
    total_count.div_ceil(per_page)
}

/// Escape LIKE wildcards so the keyword matches literally.
fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn apply_filters(mut select: Select<Gpus>, query: &CatalogQuery) -> Select<Gpus> {
    if let Some(ref keyword) = query.keyword {
        let pattern = like_pattern(keyword);
        select = select.filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col(gpus::Column::Name)))
                        .like(LikeExpr::new(pattern.clone()).escape('\\')),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col(gpus::Column::Series)))
                        .like(LikeExpr::new(pattern).escape('\\')),
                ),
        );
    }

    if let Some(ref manufacturer) = query.manufacturer {
        select = select.filter(gpus::Column::Manufacturer.eq(manufacturer.as_str()));
    }

    if let Some(min) = query.price_min {
        select = select.filter(gpus::Column::CurrentPrice.gte(min));
    }

    if let Some(max) = query.price_max {
        select = select.filter(gpus::Column::CurrentPrice.lte(max));
    }

    // Cost-performance only ranks gpus it can compute a ratio for
    if query.sort == SortMode::CostPerformance {
        select = select
            .filter(gpus::Column::CurrentPrice.gt(0))
            .filter(gpus::Column::BenchmarkScore.gt(0));
    }

    select
}

fn apply_sort(select: Select<Gpus>, sort: SortMode) -> Select<Gpus> {
    let select = match sort {
        SortMode::PriceAsc => select.order_by(gpus::Column::CurrentPrice, Order::Asc),
        SortMode::PriceDesc => select.order_by(gpus::Column::CurrentPrice, Order::Desc),
        SortMode::Performance => select.order_by_with_nulls(
            gpus::Column::BenchmarkScore,
            Order::Desc,
            NullOrdering::Last,
        ),
        SortMode::CostPerformance => select.order_by(
            Expr::cust("CAST(benchmark_score AS DOUBLE PRECISION) / current_price"),
            Order::Desc,
        ),
        SortMode::Name => select.order_by(gpus::Column::Name, Order::Asc),
        SortMode::Popularity => select.order_by(gpus::Column::Popularity, Order::Desc),
    };

    // Stable pages across equal sort keys
    select.order_by(gpus::Column::Id, Order::Asc)
}

/// Run a filtered, sorted, paginated catalog query.
pub async fn list_gpus(
    db: &DatabaseConnection,
    query: &CatalogQuery,
) -> Result<CatalogPage, CatalogError> {
    let select = apply_filters(Gpus::find(), query);

    let total_count = select.clone().count(db).await?;
    let total_pages = total_pages(total_count, PER_PAGE);
    let page = query.page.max(1);

    // Offsets past the last page can exceed what the driver binds as i64
    let gpus = if page > total_pages {
        Vec::new()
    } else {
        apply_sort(select, query.sort)
            .offset((page - 1) * PER_PAGE)
            .limit(PER_PAGE)
            .all(db)
            .await?
    };

    debug!(
        sort = query.sort.as_str(),
        page,
        total_count,
        returned = gpus.len(),
        "Catalog query completed"
    );

    Ok(CatalogPage {
        gpus,
        current_page: page,
        total_pages,
        total_count,
        per_page: PER_PAGE,
    })
}

pub async fn find_gpu<C>(db: &C, gpu_id: i32) -> Result<gpus::Model, CatalogError>
where
    C: ConnectionTrait,
{
    Gpus::find_by_id(gpu_id)
        .one(db)
        .await?
        .ok_or(CatalogError::NotFound(gpu_id))
}

/// Replace the stored image url, leaving every other column untouched.
pub async fn update_image_url<C>(db: &C, gpu_id: i32, image_url: &str) -> Result<(), CatalogError>
where
    C: ConnectionTrait,
{
    let result = Gpus::update_many()
        .col_expr(gpus::Column::ImageUrl, Expr::value(image_url))
        .filter(gpus::Column::Id.eq(gpu_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(CatalogError::NotFound(gpu_id));
    }
    Ok(())
}

/// Popularity port: a favorite was added for `gpu_id`.
pub async fn on_favorite_added<C>(db: &C, gpu_id: i32) -> Result<(), CatalogError>
where
    C: ConnectionTrait,
{
    let result = Gpus::update_many()
        .col_expr(
            gpus::Column::Popularity,
            Expr::col(gpus::Column::Popularity).add(1),
        )
        .filter(gpus::Column::Id.eq(gpu_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(CatalogError::NotFound(gpu_id));
    }
    Ok(())
}

/// Popularity port: a favorite was removed for `gpu_id`. Never goes below 0.
pub async fn on_favorite_removed<C>(db: &C, gpu_id: i32) -> Result<(), CatalogError>
where
    C: ConnectionTrait,
{
    let result = Gpus::update_many()
        .col_expr(
            gpus::Column::Popularity,
            Expr::cust("CASE WHEN popularity > 0 THEN popularity - 1 ELSE 0 END"),
        )
        .filter(gpus::Column::Id.eq(gpu_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(CatalogError::NotFound(gpu_id));
    }
    Ok(())
}
