//! Request signing for the Product Advertising API
//!
//! Implements the AWS Signature Version 4 flow the API requires:
//! derive a date/region/service scoped key, hash the canonical request,
//! sign the string-to-sign and assemble the `Authorization` header.
//! Pure computation; nothing here touches the network.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNING_ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const PAAPI_SERVICE: &str = "ProductAdvertisingAPI";
pub const GET_ITEMS_TARGET: &str = "com.amazon.paapi5.v1.ProductAdvertisingAPIv1.GetItems";
pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";

const SIGNED_HEADERS: &str = "content-type;host;x-amz-date;x-amz-target";

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("invalid HMAC key: {0}")]
    InvalidKey(#[from] hmac::digest::InvalidLength),
}

/// Builds signed headers for one API operation.
#[derive(Clone)]
pub struct RequestSigner {
    access_key: String,
    secret_key: String,
    host: String,
    region: String,
    service: String,
    target: String,
}

impl RequestSigner {
    pub fn new(access_key: String, secret_key: String, host: String, region: String) -> Self {
        Self {
            access_key,
            secret_key,
            host,
            region,
            service: PAAPI_SERVICE.to_string(),
            target: GET_ITEMS_TARGET.to_string(),
        }
    }

    /// Headers for a POST of `body` to `path` at instant `now`.
    ///
    /// Returns `Authorization`, `x-amz-date`, `x-amz-target` and `host`.
    /// The caller must send `Content-Type: application/json; charset=utf-8`
    /// and the exact `body` bytes, since both are covered by the signature.
    pub fn sign(
        &self,
        path: &str,
        body: &str,
        now: DateTime<Utc>,
    ) -> Result<BTreeMap<String, String>, SigningError> {
        let datestamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        let canonical_request = self.canonical_request(path, body, &amz_date);
        let credential_scope = format!(
            "{}/{}/{}/aws4_request",
            datestamp, self.region, self.service
        );
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            SIGNING_ALGORITHM,
            amz_date,
            credential_scope,
            sha256_hex(canonical_request.as_bytes())
        );

        let signing_key = derive_signing_key(&self.secret_key, &datestamp, &self.region, &self.service)?;
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            SIGNING_ALGORITHM, self.access_key, credential_scope, SIGNED_HEADERS, signature
        );

        let mut headers = BTreeMap::new();
        headers.insert("Authorization".to_string(), authorization);
        headers.insert("x-amz-date".to_string(), amz_date);
        headers.insert("x-amz-target".to_string(), self.target.clone());
        headers.insert("host".to_string(), self.host.clone());
        Ok(headers)
    }

    fn canonical_request(&self, path: &str, body: &str, amz_date: &str) -> String {
        let canonical_headers = format!(
            "content-type:{}\nhost:{}\nx-amz-date:{}\nx-amz-target:{}\n",
            CONTENT_TYPE, self.host, amz_date, self.target
        );

        // Empty line is the (absent) query string
        format!(
            "POST\n{}\n\n{}\n{}\n{}",
            path,
            canonical_headers,
            SIGNED_HEADERS,
            sha256_hex(body.as_bytes())
        )
    }
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("host", &self.host)
            .field("region", &self.region)
            .field("service", &self.service)
            .finish()
    }
}

/// kSigning = HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")
pub fn derive_signing_key(
    secret_key: &str,
    datestamp: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, SigningError> {
    let k_date = hmac_sha256(format!("AWS4{}", secret_key).as_bytes(), datestamp.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, SigningError> {
    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
