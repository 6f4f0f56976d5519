//! Product Advertising API client
//!
//! Fetches the current listing price and primary image for one ASIN.
//! A non-success HTTP status or an empty item list is "no result", not an
//! error; transport failures and undecodable bodies are errors.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::PaapiConfig;
use crate::services::request_signer::{CONTENT_TYPE, RequestSigner, SigningError};

pub const GET_ITEMS_PATH: &str = "/paapi5/getitems";

const RESOURCES: [&str; 3] = [
    "ItemInfo.Title",
    "Offers.Listings.Price",
    "Images.Primary.Large",
];

#[derive(Debug, Error)]
pub enum PaapiError {
    #[error("item id must not be empty")]
    EmptyItemId,
    #[error("request signing failed: {0}")]
    Signing(#[from] SigningError),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("malformed price amount: {0}")]
    MalformedAmount(String),
}

/// Normalized lookup result for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLookup {
    /// First listing's amount truncated to an integer; `None` when unlisted
    pub price: Option<i64>,
    pub image_url: Option<String>,
}

/// Anything that can quote a price for an ASIN.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_price(&self, asin: &str) -> Result<Option<PriceLookup>, PaapiError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct GetItemsRequest<'a> {
    item_ids: [&'a str; 1],
    resources: [&'static str; 3],
    partner_tag: &'a str,
    partner_type: &'static str,
    marketplace: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetItemsResponse {
    items_result: Option<ItemsResult>,
    #[serde(default)]
    errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiErrorEntry {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ItemsResult {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Item {
    offers: Option<Offers>,
    images: Option<Images>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Offers {
    #[serde(default)]
    listings: Vec<Listing>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Listing {
    price: Option<ListingPrice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListingPrice {
    /// Number or numeric string depending on the marketplace
    amount: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Images {
    primary: Option<PrimaryImages>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PrimaryImages {
    large: Option<ImageVariant>,
}

#[derive(Debug, Deserialize)]
struct ImageVariant {
    #[serde(rename = "URL")]
    url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PaapiClient {
    client: Client,
    endpoint: String,
    partner_tag: String,
    marketplace: String,
    signer: RequestSigner,
}

impl PaapiClient {
    pub fn new(config: &PaapiConfig) -> Result<Self, PaapiError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            partner_tag: config.partner_tag.clone(),
            marketplace: config.marketplace.clone(),
            signer: RequestSigner::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                config.host.clone(),
                config.region.clone(),
            ),
        })
    }

    /// Serialized GetItems payload for a single ASIN
    fn payload(&self, asin: &str) -> Result<String, PaapiError> {
        let request = GetItemsRequest {
            item_ids: [asin],
            resources: RESOURCES,
            partner_tag: &self.partner_tag,
            partner_type: "Associates",
            marketplace: &self.marketplace,
        };
        Ok(serde_json::to_string(&request)?)
    }

    pub async fn get_item_price(&self, asin: &str) -> Result<Option<PriceLookup>, PaapiError> {
        if asin.trim().is_empty() {
            return Err(PaapiError::EmptyItemId);
        }

        let body = self.payload(asin)?;
        let headers = self.signer.sign(GET_ITEMS_PATH, &body, Utc::now())?;

        tracing::debug!(asin = %asin, "Requesting item price from PA-API");

        let url = format!("{}{}", self.endpoint, GET_ITEMS_PATH);
        let mut request = self
            .client
            .post(&url)
            .header("content-type", CONTENT_TYPE);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request.body(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(asin = %asin, status = %status, "PA-API returned non-success status");
            return Ok(None);
        }

        let text = response.text().await?;
        parse_get_items_response(&text)
    }
}

#[async_trait]
impl PriceSource for PaapiClient {
    async fn fetch_price(&self, asin: &str) -> Result<Option<PriceLookup>, PaapiError> {
        self.get_item_price(asin).await
    }
}

/// Extract price and image from a GetItems response body.
///
/// Only the first item and its first listing are considered.
pub fn parse_get_items_response(body: &str) -> Result<Option<PriceLookup>, PaapiError> {
    let response: GetItemsResponse = serde_json::from_str(body)?;

    if let Some(err) = response.errors.first() {
        tracing::debug!(
            code = err.code.as_deref().unwrap_or("unknown"),
            message = err.message.as_deref().unwrap_or(""),
            "PA-API reported errors"
        );
    }

    let Some(item) = response
        .items_result
        .and_then(|result| result.items.into_iter().next())
    else {
        return Ok(None);
    };

    let amount = item
        .offers
        .and_then(|offers| offers.listings.into_iter().next())
        .and_then(|listing| listing.price)
        .and_then(|price| price.amount);

    let price = match amount {
        Some(value) => Some(truncate_amount(&value)?),
        None => None,
    };

    let image_url = item
        .images
        .and_then(|images| images.primary)
        .and_then(|primary| primary.large)
        .and_then(|large| large.url);

    Ok(Some(PriceLookup { price, image_url }))
}

/// Parse a listing amount and drop the fractional part (no rounding).
fn truncate_amount(value: &Value) -> Result<i64, PaapiError> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match amount {
        Some(a) if a.is_finite() => Ok(a.trunc() as i64),
        _ => Err(PaapiError::MalformedAmount(value.to_string())),
    }
}
