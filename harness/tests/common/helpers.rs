//! Test helpers: a wiremock-backed emulator and session plumbing

use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use harness::traits::{MockEmulatorLauncher, MockTestRunner};
use harness::*;
use shared::{TestItem, TestOutcome};

use super::fixtures::TestFixtures;

/// Control plane of a fake emulator
pub struct MockEmulator {
    pub server: MockServer,
}

impl MockEmulator {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Emulator answering its health check with `services`
    pub async fn healthy(services: &[&str]) -> Self {
        let emulator = Self::start().await;
        emulator.mount_health(services).await;
        emulator
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub async fn mount_health(&self, services: &[&str]) {
        Mock::given(method("GET"))
            .and(path("/_localstack/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestFixtures::health_report(services)))
            .mount(&self.server)
            .await;
    }

    /// `/metrics/raw` returning `count` records, expected `calls` times
    pub async fn mount_metrics(&self, count: usize, calls: u64) {
        Mock::given(method("GET"))
            .and(path("/metrics/raw"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestFixtures::metrics(count)))
            .expect(calls)
            .mount(&self.server)
            .await;
    }

    pub async fn mount_metrics_reset(&self, status: u16, calls: u64) {
        Mock::given(method("DELETE"))
            .and(path("/metrics/reset"))
            .respond_with(ResponseTemplate::new(status))
            .expect(calls)
            .mount(&self.server)
            .await;
    }

    pub async fn mount_state_reset(&self, calls: u64) {
        Mock::given(method("POST"))
            .and(path("/_localstack/state/reset"))
            .respond_with(ResponseTemplate::new(200))
            .expect(calls)
            .mount(&self.server)
            .await;
    }
}

pub struct TestHelpers;

impl TestHelpers {
    /// Config pointing at `endpoint` with a fast retry schedule and a report
    /// inside `report_dir`
    pub fn config(endpoint: &str, report_dir: &Path) -> HarnessConfig {
        HarnessConfig::builder()
            .endpoint(endpoint)
            .report_path(report_dir.join("reports/metric_data_raw.csv"))
            .backoff_factor(Duration::from_millis(1))
            .build()
            .expect("test config is valid")
    }

    pub fn report_dir() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    pub fn items(ids: &[&str]) -> Vec<TestItem> {
        ids.iter()
            .map(|id| TestItem::parse(id).expect("valid node id"))
            .collect()
    }

    /// Launcher that must never be asked to start
    pub fn idle_launcher() -> MockEmulatorLauncher {
        let mut launcher = MockEmulatorLauncher::new();
        launcher.expect_name().return_const("mock");
        launcher.expect_start().times(0);
        launcher
    }

    /// Launcher expecting exactly `starts` start and `stops` stop requests
    pub fn counting_launcher(starts: usize, stops: usize) -> MockEmulatorLauncher {
        let mut launcher = MockEmulatorLauncher::new();
        launcher.expect_name().return_const("mock");
        launcher.expect_start().times(starts).returning(|| Ok(()));
        launcher.expect_stop().times(stops).returning(|| Ok(()));
        launcher
    }

    /// Runner failing every node id ending in `_fail`
    pub fn runner() -> MockTestRunner {
        let mut runner = MockTestRunner::new();
        runner.expect_run().returning(|item| {
            Ok(if item.node_id().ends_with("_fail") {
                TestOutcome::Failed
            } else {
                TestOutcome::Passed
            })
        });
        runner
    }

    pub fn lifecycle(config: &HarnessConfig, launcher: MockEmulatorLauncher) -> LifecycleManager {
        let client = EmulatorClient::new(config).expect("client");
        LifecycleManager::new(HealthProber::new(client, config.probe.clone()), Box::new(launcher))
    }

    pub fn report_rows(report: &MetricReport) -> Vec<csv::StringRecord> {
        let mut reader = csv::Reader::from_path(report.path()).expect("report readable");
        reader.records().map(|r| r.expect("valid row")).collect()
    }
}
