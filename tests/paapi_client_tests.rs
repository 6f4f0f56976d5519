use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use gpu_price_tracker::config::PaapiConfig;
use gpu_price_tracker::services::paapi_client::{PaapiClient, PaapiError, PriceSource};
use serde_json::{json, Value};

#[derive(Debug, Clone)]
struct CapturedRequest {
    headers: HeaderMap,
    body: String,
}

#[derive(Clone)]
struct FakeApi {
    status: StatusCode,
    reply: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

async fn get_items(State(api): State<FakeApi>, headers: HeaderMap, body: String) -> (StatusCode, String) {
    api.captured
        .lock()
        .unwrap()
        .push(CapturedRequest { headers, body });
    (api.status, api.reply.clone())
}

/// Serve canned GetItems replies on an ephemeral local port
async fn spawn_fake_api(status: StatusCode, reply: Value) -> (String, Arc<Mutex<Vec<CapturedRequest>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let api = FakeApi {
        status,
        reply: reply.to_string(),
        captured: captured.clone(),
    };

    let app = Router::new()
        .route("/paapi5/getitems", post(get_items))
        .with_state(api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), captured)
}

fn test_config(endpoint: &str) -> PaapiConfig {
    PaapiConfig {
        access_key: "AKIDEXAMPLE".to_string(),
        secret_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
        partner_tag: "gputracker-22".to_string(),
        host: "webservices.amazon.co.jp".to_string(),
        endpoint: endpoint.to_string(),
        region: "us-west-2".to_string(),
        marketplace: "www.amazon.co.jp".to_string(),
        timeout: Duration::from_secs(5),
        pacing_interval: Duration::ZERO,
    }
}

#[tokio::test]
async fn test_fetch_price_success() {
    let reply = json!({
        "ItemsResult": { "Items": [{
            "ASIN": "B0RTX4090A",
            "Offers": { "Listings": [{ "Price": { "Amount": 298000.0, "Currency": "JPY" } }] },
            "Images": { "Primary": { "Large": { "URL": "https://m.media-amazon.com/images/I/gpu.jpg" } } }
        }] }
    });
    let (endpoint, captured) = spawn_fake_api(StatusCode::OK, reply).await;
    let client = PaapiClient::new(&test_config(&endpoint)).unwrap();

    let lookup = client.fetch_price("B0RTX4090A").await.unwrap().unwrap();

    assert_eq!(lookup.price, Some(298000));
    assert_eq!(
        lookup.image_url.as_deref(),
        Some("https://m.media-amazon.com/images/I/gpu.jpg")
    );

    let requests = captured.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];

    let authorization = request.headers["authorization"].to_str().unwrap();
    assert!(authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
    assert!(authorization.contains("/us-west-2/ProductAdvertisingAPI/aws4_request"));
    assert!(authorization.contains("SignedHeaders=content-type;host;x-amz-date;x-amz-target"));
    assert_eq!(
        request.headers["x-amz-target"],
        "com.amazon.paapi5.v1.ProductAdvertisingAPIv1.GetItems"
    );
    assert!(request.headers.contains_key("x-amz-date"));

    let payload: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(payload["ItemIds"], json!(["B0RTX4090A"]));
    assert_eq!(payload["PartnerTag"], "gputracker-22");
}

#[tokio::test]
async fn test_fetch_price_non_success_status_is_no_result() {
    let reply = json!({ "Errors": [{ "Code": "TooManyRequests", "Message": "slow down" }] });
    let (endpoint, _captured) = spawn_fake_api(StatusCode::TOO_MANY_REQUESTS, reply).await;
    let client = PaapiClient::new(&test_config(&endpoint)).unwrap();

    let result = client.fetch_price("B0RTX4090A").await.unwrap();

    assert_eq!(result, None);
}

#[tokio::test]
async fn test_fetch_price_server_error_is_no_result() {
    let (endpoint, _captured) = spawn_fake_api(StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;
    let client = PaapiClient::new(&test_config(&endpoint)).unwrap();

    assert_eq!(client.fetch_price("B0RTX4090A").await.unwrap(), None);
}

#[tokio::test]
async fn test_fetch_price_without_listing() {
    let reply = json!({ "ItemsResult": { "Items": [{ "ASIN": "B0SOLDOUT1" }] } });
    let (endpoint, _captured) = spawn_fake_api(StatusCode::OK, reply).await;
    let client = PaapiClient::new(&test_config(&endpoint)).unwrap();

    let lookup = client.fetch_price("B0SOLDOUT1").await.unwrap().unwrap();

    assert_eq!(lookup.price, None);
    assert_eq!(lookup.image_url, None);
}

#[tokio::test]
async fn test_empty_item_id_is_rejected_before_sending() {
    let (endpoint, captured) = spawn_fake_api(StatusCode::OK, json!({})).await;
    let client = PaapiClient::new(&test_config(&endpoint)).unwrap();

    let result = client.fetch_price("  ").await;

    assert!(matches!(result, Err(PaapiError::EmptyItemId)));
    assert!(captured.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_error() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = PaapiClient::new(&test_config(&format!("http://{}", addr))).unwrap();
    let result = client.fetch_price("B0RTX4090A").await;

    assert!(matches!(result, Err(PaapiError::Http(_))));
}
