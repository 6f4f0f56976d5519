//! Process configuration loaded from the environment
//!
//! `.env` is loaded by the binaries through `dotenvy` before any of these
//! constructors run.

use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_PAAPI_HOST: &str = "webservices.amazon.co.jp";
pub const DEFAULT_PAAPI_REGION: &str = "us-west-2";
pub const DEFAULT_MARKETPLACE: &str = "www.amazon.co.jp";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PACING_MS: u64 = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            database_url: required(&lookup, "DATABASE_URL")?,
            bind_addr: optional(&lookup, "BIND_ADDR")
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}

/// Credentials and endpoint for the Product Advertising API
#[derive(Clone)]
pub struct PaapiConfig {
    pub access_key: String,
    pub secret_key: String,
    pub partner_tag: String,
    /// Host used for the `host` header and in the signature
    pub host: String,
    /// Scheme + authority requests are sent to
    pub endpoint: String,
    pub region: String,
    pub marketplace: String,
    pub timeout: Duration,
    /// Pause between two items of a price sweep
    pub pacing_interval: Duration,
}

impl PaapiConfig {
    /// Load API settings; any missing secret is fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_key = required(&lookup, "AMAZON_ACCESS_KEY")?;
        let secret_key = required(&lookup, "AMAZON_SECRET_KEY")?;
        let partner_tag = required(&lookup, "AMAZON_PARTNER_TAG")?;

        let host = optional(&lookup, "PAAPI_HOST").unwrap_or_else(|| DEFAULT_PAAPI_HOST.to_string());
        let endpoint = optional(&lookup, "PAAPI_ENDPOINT").unwrap_or_else(|| format!("https://{}", host));

        Ok(Self {
            access_key,
            secret_key,
            partner_tag,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            host,
            region: optional(&lookup, "PAAPI_REGION")
                .unwrap_or_else(|| DEFAULT_PAAPI_REGION.to_string()),
            marketplace: optional(&lookup, "PAAPI_MARKETPLACE")
                .unwrap_or_else(|| DEFAULT_MARKETPLACE.to_string()),
            timeout: Duration::from_secs(parse_u64(&lookup, "PAAPI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?),
            pacing_interval: Duration::from_millis(parse_u64(&lookup, "PRICE_SYNC_PACING_MS", DEFAULT_PACING_MS)?),
        })
    }
}

impl fmt::Debug for PaapiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaapiConfig")
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("partner_tag", &"<redacted>")
            .field("host", &self.host)
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("marketplace", &self.marketplace)
            .field("timeout", &self.timeout)
            .field("pacing_interval", &self.pacing_interval)
            .finish()
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}

fn parse_u64<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match optional(lookup, key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
