mod common;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use gpu_price_tracker::entities::{gpus, price_histories, prelude::*};
use gpu_price_tracker::jobs::gpu_price_sync::run_price_sweep;
use gpu_price_tracker::jobs::pacing::{NoopPacer, Pacer};
use gpu_price_tracker::services::paapi_client::{PaapiError, PriceLookup, PriceSource};
use gpu_price_tracker::services::price_history::{self, PriceHistoryError};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use crate::common::{setup_test_db, GpuSeed};

#[derive(Clone)]
enum Reply {
    Found(Option<i64>, Option<&'static str>),
    Nothing,
    Fail(&'static str),
}

/// Scripted price source that records every ASIN it is asked about
#[derive(Default)]
struct StubSource {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
}

impl StubSource {
    fn with(mut self, asin: &str, reply: Reply) -> Self {
        self.replies.insert(asin.to_string(), reply);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for StubSource {
    async fn fetch_price(&self, asin: &str) -> Result<Option<PriceLookup>, PaapiError> {
        self.calls.lock().unwrap().push(asin.to_string());
        match self.replies.get(asin).cloned().unwrap_or(Reply::Nothing) {
            Reply::Found(price, image) => Ok(Some(PriceLookup {
                price,
                image_url: image.map(str::to_string),
            })),
            Reply::Nothing => Ok(None),
            Reply::Fail(raw) => Err(PaapiError::MalformedAmount(raw.to_string())),
        }
    }
}

#[derive(Default)]
struct CountingPacer {
    pauses: AtomicUsize,
}

#[async_trait]
impl Pacer for CountingPacer {
    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }
}

async fn history_count(db: &DatabaseConnection, gpu_id: i32) -> u64 {
    PriceHistories::find()
        .filter(price_histories::Column::GpuId.eq(gpu_id))
        .count(db)
        .await
        .unwrap()
}

async fn reload(db: &DatabaseConnection, gpu_id: i32) -> gpus::Model {
    Gpus::find_by_id(gpu_id).one(db).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_sweep_records_price_and_image() {
    let db = setup_test_db().await.unwrap();
    let gpu = GpuSeed::new("ASUS TUF Gaming NVIDIA RTX 4090")
        .asin("B0RTX4090A")
        .image("https://old-img.example.com/gpu.jpg")
        .insert(&db)
        .await;

    let source = StubSource::default().with(
        "B0RTX4090A",
        Reply::Found(Some(50000), Some("https://new-img.example.com/gpu.jpg")),
    );

    let report = run_price_sweep(&db, &source, &NoopPacer).await.unwrap();

    assert_eq!(report.eligible, 1);
    assert_eq!(report.recorded, 1);
    assert!(report.failures.is_empty());
    assert_eq!(history_count(&db, gpu.id).await, 1);

    let updated = reload(&db, gpu.id).await;
    assert_eq!(updated.current_price, 50000);
    assert_eq!(updated.image_url.as_deref(), Some("https://new-img.example.com/gpu.jpg"));
}

#[tokio::test]
async fn test_sweep_keeps_image_when_none_returned() {
    let db = setup_test_db().await.unwrap();
    let gpu = GpuSeed::new("MSI SUPRIM X NVIDIA RTX 4090")
        .asin("B0RTX4090B")
        .image("https://old-img.example.com/gpu.jpg")
        .insert(&db)
        .await;

    let source = StubSource::default().with("B0RTX4090B", Reply::Found(Some(60000), None));
    run_price_sweep(&db, &source, &NoopPacer).await.unwrap();

    let updated = reload(&db, gpu.id).await;
    assert_eq!(updated.current_price, 60000);
    assert_eq!(updated.image_url.as_deref(), Some("https://old-img.example.com/gpu.jpg"));
}

#[tokio::test]
async fn test_sweep_skips_no_result_and_no_price() {
    let db = setup_test_db().await.unwrap();
    let missing = GpuSeed::new("GPU without listing").asin("B0MISSING1").price(70000).insert(&db).await;
    let unpriced = GpuSeed::new("GPU without price").asin("B0NOPRICE1").price(80000).insert(&db).await;

    let source = StubSource::default()
        .with("B0MISSING1", Reply::Nothing)
        .with("B0NOPRICE1", Reply::Found(None, Some("https://img.example.com/x.jpg")));

    let report = run_price_sweep(&db, &source, &NoopPacer).await.unwrap();

    assert_eq!(report.skipped, 2);
    assert_eq!(report.recorded, 0);
    assert!(report.failures.is_empty());
    assert_eq!(history_count(&db, missing.id).await, 0);
    assert_eq!(history_count(&db, unpriced.id).await, 0);
    assert_eq!(reload(&db, missing.id).await.current_price, 70000);

    // No price means nothing is written, image included
    let unpriced_after = reload(&db, unpriced.id).await;
    assert_eq!(unpriced_after.current_price, 80000);
    assert_eq!(unpriced_after.image_url, None);
}

#[tokio::test]
async fn test_sweep_never_contacts_gpus_without_asin() {
    let db = setup_test_db().await.unwrap();
    GpuSeed::new("Tracked").asin("B0TRACKED1").insert(&db).await;
    let untracked = GpuSeed::new("Untracked").insert(&db).await;

    let source = StubSource::default().with("B0TRACKED1", Reply::Found(Some(70000), None));
    let report = run_price_sweep(&db, &source, &NoopPacer).await.unwrap();

    assert_eq!(source.calls(), vec!["B0TRACKED1".to_string()]);
    assert_eq!(report.eligible, 1);
    assert_eq!(history_count(&db, untracked.id).await, 0);
}

#[tokio::test]
async fn test_sweep_isolates_item_failures() {
    let db = setup_test_db().await.unwrap();
    let broken = GpuSeed::new("Broken response").asin("B0BROKEN01").insert(&db).await;
    let healthy = GpuSeed::new("Healthy response").asin("B0HEALTHY1").insert(&db).await;

    let source = StubSource::default()
        .with("B0BROKEN01", Reply::Fail("not a number"))
        .with("B0HEALTHY1", Reply::Found(Some(148000), None));

    let report = run_price_sweep(&db, &source, &NoopPacer).await.unwrap();

    assert_eq!(report.recorded, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].gpu_id, broken.id);
    assert_eq!(report.failures[0].gpu_name, "Broken response");
    assert!(report.failures[0].error.contains("not a number"));

    assert_eq!(history_count(&db, broken.id).await, 0);
    assert_eq!(reload(&db, healthy.id).await.current_price, 148000);
}

#[tokio::test]
async fn test_sweep_rejects_negative_price_without_aborting() {
    let db = setup_test_db().await.unwrap();
    let negative = GpuSeed::new("Negative").asin("B0NEGATIVE").price(1000).insert(&db).await;
    let fine = GpuSeed::new("Fine").asin("B0FINE0001").insert(&db).await;

    let source = StubSource::default()
        .with("B0NEGATIVE", Reply::Found(Some(-5), None))
        .with("B0FINE0001", Reply::Found(Some(42000), None));

    let report = run_price_sweep(&db, &source, &NoopPacer).await.unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].gpu_id, negative.id);
    assert_eq!(reload(&db, negative.id).await.current_price, 1000);
    assert_eq!(reload(&db, fine.id).await.current_price, 42000);
}

#[tokio::test]
async fn test_sweep_paces_between_every_item() {
    let db = setup_test_db().await.unwrap();
    GpuSeed::new("One").asin("B0ONE00001").insert(&db).await;
    GpuSeed::new("Two").asin("B0TWO00001").insert(&db).await;
    GpuSeed::new("Three").asin("B0THREE001").insert(&db).await;
    GpuSeed::new("Not tracked").insert(&db).await;

    // Success, failure and no-result all count toward pacing
    let source = StubSource::default()
        .with("B0ONE00001", Reply::Found(Some(1000), None))
        .with("B0TWO00001", Reply::Fail("boom"))
        .with("B0THREE001", Reply::Nothing);
    let pacer = CountingPacer::default();

    run_price_sweep(&db, &source, &pacer).await.unwrap();

    assert_eq!(pacer.pauses.load(Ordering::SeqCst), 2);
    assert_eq!(source.calls().len(), 3);
}

#[tokio::test]
async fn test_repeated_sweeps_append_history() {
    let db = setup_test_db().await.unwrap();
    let gpu = GpuSeed::new("Repeat").asin("B0REPEAT01").insert(&db).await;
    let source = StubSource::default().with("B0REPEAT01", Reply::Found(Some(89800), None));

    run_price_sweep(&db, &source, &NoopPacer).await.unwrap();
    run_price_sweep(&db, &source, &NoopPacer).await.unwrap();

    assert_eq!(history_count(&db, gpu.id).await, 2);
    assert_eq!(reload(&db, gpu.id).await.current_price, 89800);
}

#[tokio::test]
async fn test_empty_catalog_sweep() {
    let db = setup_test_db().await.unwrap();
    let report = run_price_sweep(&db, &StubSource::default(), &NoopPacer).await.unwrap();
    assert_eq!(report.eligible, 0);
    assert_eq!(report.recorded, 0);
}

#[tokio::test]
async fn test_record_price_point_sets_current_price() {
    let db = setup_test_db().await.unwrap();
    let gpu = GpuSeed::new("Direct write").insert(&db).await;
    assert_eq!(gpu.current_price, 0);

    price_history::record_price_point(&db, gpu.id, 320000, common::days_ago(2)).await.unwrap();
    assert_eq!(reload(&db, gpu.id).await.current_price, 320000);

    price_history::record_price_point(&db, gpu.id, 310000, common::days_ago(1)).await.unwrap();
    assert_eq!(reload(&db, gpu.id).await.current_price, 310000);
    assert_eq!(history_count(&db, gpu.id).await, 2);
}

#[tokio::test]
async fn test_record_price_point_validation() {
    let db = setup_test_db().await.unwrap();
    let gpu = GpuSeed::new("Validated").price(5000).insert(&db).await;

    let negative = price_history::record_price_point(&db, gpu.id, -1, common::days_ago(0)).await;
    assert!(matches!(negative, Err(PriceHistoryError::InvalidPrice(-1))));

    let too_big = price_history::record_price_point(&db, gpu.id, i64::from(i32::MAX) + 1, common::days_ago(0)).await;
    assert!(matches!(too_big, Err(PriceHistoryError::InvalidPrice(_))));

    let unknown = price_history::record_price_point(&db, 9999, 100, common::days_ago(0)).await;
    assert!(matches!(unknown, Err(PriceHistoryError::GpuNotFound(9999))));

    assert_eq!(history_count(&db, gpu.id).await, 0);
    assert_eq!(reload(&db, gpu.id).await.current_price, 5000);
}

#[tokio::test]
async fn test_sync_status_gates_scheduled_sweeps() {
    use gpu_price_tracker::services::sync_status::{self, intervals, jobs};

    let db = setup_test_db().await.unwrap();

    assert!(sync_status::should_sync(&db, jobs::GPU_PRICE_SYNC).await.unwrap());

    // A failure alone never marks the job as done
    sync_status::record_failure(&db, jobs::GPU_PRICE_SYNC, "timeout", intervals::GPU_PRICE_SYNC)
        .await
        .unwrap();
    assert!(sync_status::should_sync(&db, jobs::GPU_PRICE_SYNC).await.unwrap());

    sync_status::record_success(&db, jobs::GPU_PRICE_SYNC, intervals::GPU_PRICE_SYNC)
        .await
        .unwrap();
    assert!(!sync_status::should_sync(&db, jobs::GPU_PRICE_SYNC).await.unwrap());

    let record = SyncStatus::find().one(&db).await.unwrap().unwrap();
    assert_eq!(record.success_count, 1);
    assert_eq!(record.error_count, 1);
    assert_eq!(record.last_error, None);
}

#[tokio::test]
async fn test_price_observation_commits_price_and_image_together() {
    let db = setup_test_db().await.unwrap();
    let gpu = GpuSeed::new("Observed")
        .price(5000)
        .image("https://old-img.example.com/gpu.jpg")
        .insert(&db)
        .await;

    let rejected = price_history::record_price_observation(
        &db,
        gpu.id,
        -10,
        Some("https://new-img.example.com/gpu.jpg"),
        common::days_ago(0),
    )
    .await;
    assert!(matches!(rejected, Err(PriceHistoryError::InvalidPrice(-10))));

    let untouched = reload(&db, gpu.id).await;
    assert_eq!(untouched.current_price, 5000);
    assert_eq!(untouched.image_url.as_deref(), Some("https://old-img.example.com/gpu.jpg"));
    assert_eq!(history_count(&db, gpu.id).await, 0);

    let point = price_history::record_price_observation(
        &db,
        gpu.id,
        4800,
        Some("https://new-img.example.com/gpu.jpg"),
        common::days_ago(0),
    )
    .await
    .unwrap();
    assert_eq!(point.price, 4800);

    let updated = reload(&db, gpu.id).await;
    assert_eq!(updated.current_price, 4800);
    assert_eq!(updated.image_url.as_deref(), Some("https://new-img.example.com/gpu.jpg"));
    assert_eq!(history_count(&db, gpu.id).await, 1);
}

#[tokio::test]
async fn test_sweep_failure_leaves_image_and_history_untouched() {
    let db = setup_test_db().await.unwrap();
    let gpu = GpuSeed::new("Rejected quote")
        .asin("B0REJECT01")
        .price(1000)
        .image("https://old-img.example.com/gpu.jpg")
        .insert(&db)
        .await;

    let source = StubSource::default().with(
        "B0REJECT01",
        Reply::Found(Some(-1), Some("https://new-img.example.com/gpu.jpg")),
    );
    let report = run_price_sweep(&db, &source, &NoopPacer).await.unwrap();

    // Recorded and failed never overlap for the same gpu
    assert_eq!(report.recorded, 0);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(history_count(&db, gpu.id).await, 0);
    assert_eq!(
        reload(&db, gpu.id).await.image_url.as_deref(),
        Some("https://old-img.example.com/gpu.jpg")
    );
}
