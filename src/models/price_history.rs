//! Price history request/response models
//!
//! Models for GET /api/gpus/{id}/price_histories.

use serde::{Deserialize, Serialize};

use crate::entities::price_histories;
use crate::services::price_history::{DEFAULT_TREND_DAYS, clamp_trend_days};

/// Query parameters for the price history endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceHistoryQuery {
    /// Window in days (default 30, capped at 365)
    pub days: Option<String>,
}

impl PriceHistoryQuery {
    /// Missing means the default window; unparseable text means an empty window.
    pub fn window_days(&self) -> i64 {
        let days = match self.days.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_TREND_DAYS,
            Some(raw) => raw.parse::<i64>().unwrap_or(0),
        };
        clamp_trend_days(days)
    }
}

/// Single point of a price trend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePointEntry {
    /// YYYY-MM-DD (UTC)
    pub date: String,
    pub price: i32,
}

impl From<price_histories::Model> for PricePointEntry {
    fn from(point: price_histories::Model) -> Self {
        Self {
            date: point.recorded_at.naive_utc().format("%Y-%m-%d").to_string(),
            price: point.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(value: Option<&str>) -> i64 {
        PriceHistoryQuery {
            days: value.map(str::to_string),
        }
        .window_days()
    }

    #[test]
    fn test_window_days() {
        assert_eq!(days(None), 30);
        assert_eq!(days(Some("")), 30);
        assert_eq!(days(Some("60")), 60);
        assert_eq!(days(Some("1000")), 365);
        assert_eq!(days(Some("-1")), 0);
        assert_eq!(days(Some("week")), 0);
    }

    #[test]
    fn test_point_entry_date_format() {
        let recorded_at = chrono::DateTime::parse_from_rfc3339("2026-02-15T21:00:05+00:00").unwrap();
        let entry = PricePointEntry::from(price_histories::Model {
            id: 1,
            gpu_id: 1,
            price: 89800,
            recorded_at,
            created_at: recorded_at,
        });
        assert_eq!(entry, PricePointEntry { date: "2026-02-15".to_string(), price: 89800 });
    }
}
