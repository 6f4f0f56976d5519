//! GPU catalog request/response models
//!
//! Models for GET /api/gpus and GET /api/gpus/{id}.

use serde::{Deserialize, Serialize};

use crate::entities::gpus;
use crate::services::catalog::{self, CatalogPage, CatalogQuery, SortMode};

/// Query parameters for the catalog listing
///
/// Everything arrives as text and is normalized leniently: blank values are
/// absent, non-numeric price bounds are ignored and a non-numeric page is 1.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GpuListQuery {
    /// Keyword matched against name or series (case-insensitive)
    pub q: Option<String>,
    /// Exact manufacturer, e.g. "NVIDIA"
    pub manufacturer: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    /// price_asc, price_desc, performance, cost_performance, name, popularity
    pub sort: Option<String>,
    pub page: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_int(value: &Option<String>) -> Option<i64> {
    non_blank(value).and_then(|v| v.parse::<i64>().ok())
}

impl GpuListQuery {
    pub fn to_catalog_query(&self) -> CatalogQuery {
        let page = parse_int(&self.page).unwrap_or(1).max(1) as u64;

        CatalogQuery {
            keyword: non_blank(&self.q),
            manufacturer: non_blank(&self.manufacturer),
            price_min: parse_int(&self.price_min),
            price_max: parse_int(&self.price_max),
            sort: SortMode::from_param(self.sort.as_deref()),
            page,
        }
    }
}

/// One catalog item as served to the front end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuEntry {
    pub id: i32,
    pub name: String,
    pub manufacturer: Option<String>,
    pub series: Option<String>,
    pub vram: Option<i32>,
    pub benchmark_score: Option<i32>,
    pub image_url: Option<String>,
    pub current_price: i32,
    pub popularity: i32,
    /// Benchmark per price, scaled by 10,000 and rounded to 2 places
    pub cost_performance: f64,
    pub amazon_asin: Option<String>,
    /// Whether the requesting user has favorited this gpu
    pub favorited: bool,
}

impl GpuEntry {
    pub fn from_model(model: gpus::Model, favorited: bool) -> Self {
        let cost_performance = catalog::cost_performance(model.current_price, model.benchmark_score);

        Self {
            id: model.id,
            name: model.name,
            manufacturer: model.manufacturer,
            series: model.series,
            vram: model.vram,
            benchmark_score: model.benchmark_score,
            image_url: model.image_url,
            current_price: model.current_price,
            popularity: model.popularity,
            cost_performance,
            amazon_asin: model.amazon_asin,
            favorited,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub per_page: u64,
}

impl From<&CatalogPage> for PaginationMeta {
    fn from(page: &CatalogPage) -> Self {
        Self {
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_count: page.total_count,
            per_page: page.per_page,
        }
    }
}

/// Response for GET /api/gpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuListResponse {
    pub items: Vec<GpuEntry>,
    pub meta: PaginationMeta,
}
