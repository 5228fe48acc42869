//! Telemetry record/reset cycle against a mock emulator

mod common;

use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use common::{MockEmulator, TestFixtures, TestHelpers};
use harness::*;

fn collector(config: &HarnessConfig) -> TelemetryCollector {
    let report = MetricReport::create(&config.report_path).unwrap();
    TelemetryCollector::new(EmulatorClient::new(config).unwrap(), report)
}

#[tokio::test]
async fn test_passed_test_appends_one_row_per_metric() {
    let emulator = MockEmulator::start().await;
    emulator.mount_metrics(3, 1).await;
    emulator.mount_metrics_reset(200, 1).await;
    emulator.mount_state_reset(1).await;

    let dir = TestHelpers::report_dir();
    let config = TestHelpers::config(&emulator.uri(), dir.path());
    let collector = collector(&config);

    collector.after_test(TestFixtures::S3_CREATE, 0, 0).await.unwrap();

    let rows = TestHelpers::report_rows(collector.report());
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| &row[7] == TestFixtures::S3_CREATE));
    assert_eq!(&rows[2][2], r#"{"Bucket":"bucket","Key":"key-2"}"#);
}

#[tokio::test]
async fn test_malformed_metrics_still_reset() {
    let emulator = MockEmulator::start().await;
    Mock::given(method("GET"))
        .and(path("/metrics/raw"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"metrics\": [tru"))
        .expect(1)
        .mount(&emulator.server)
        .await;
    emulator.mount_metrics_reset(200, 1).await;
    emulator.mount_state_reset(1).await;

    let dir = TestHelpers::report_dir();
    let config = TestHelpers::config(&emulator.uri(), dir.path());
    let collector = collector(&config);

    collector.after_test(TestFixtures::S3_CREATE, 0, 0).await.unwrap();
    assert!(TestHelpers::report_rows(collector.report()).is_empty());
}

#[tokio::test]
async fn test_failed_test_skips_collection() {
    let emulator = MockEmulator::start().await;
    emulator.mount_metrics(2, 0).await;
    emulator.mount_metrics_reset(200, 1).await;
    emulator.mount_state_reset(1).await;

    let dir = TestHelpers::report_dir();
    let config = TestHelpers::config(&emulator.uri(), dir.path());
    let collector = collector(&config);

    collector.after_test(TestFixtures::S3_FAILING, 0, 1).await.unwrap();
    assert!(TestHelpers::report_rows(collector.report()).is_empty());
}

#[tokio::test]
async fn test_metrics_reset_failure_is_fatal_after_state_reset() {
    let emulator = MockEmulator::start().await;
    emulator.mount_metrics(1, 1).await;
    emulator.mount_metrics_reset(500, 1).await;
    emulator.mount_state_reset(1).await;

    let dir = TestHelpers::report_dir();
    let config = TestHelpers::config(&emulator.uri(), dir.path());
    let collector = collector(&config);

    let err = collector.after_test(TestFixtures::S3_CREATE, 0, 0).await.unwrap_err();
    assert!(matches!(err, HarnessError::MetricsResetFailed { .. }));
    assert_eq!(TestHelpers::report_rows(collector.report()).len(), 1);
}

#[tokio::test]
async fn test_state_reset_failure_is_logged_only() {
    let emulator = MockEmulator::start().await;
    emulator.mount_metrics(0, 1).await;
    emulator.mount_metrics_reset(200, 1).await;
    Mock::given(method("POST"))
        .and(path("/_localstack/state/reset"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&emulator.server)
        .await;

    let dir = TestHelpers::report_dir();
    let config = TestHelpers::config(&emulator.uri(), dir.path());

    collector(&config).after_test(TestFixtures::S3_CREATE, 0, 0).await.unwrap();
}
