//! Telemetry Collector
//!
//! Runs after every executed test: records what the test did against the
//! emulator, then wipes metrics and resources so the next test starts clean.

use crate::error::HarnessResult;
use crate::runtime::EmulatorClient;
use crate::telemetry::report::MetricReport;
use shared::{Component, component_debug, component_error, component_warn};

pub struct TelemetryCollector {
    client: EmulatorClient,
    report: MetricReport,
}

impl TelemetryCollector {
    pub fn new(client: EmulatorClient, report: MetricReport) -> Self {
        Self { client, report }
    }

    pub fn report(&self) -> &MetricReport {
        &self.report
    }

    /// Record and reset around one finished test
    ///
    /// Metrics are only kept for tests that did not raise the session failure
    /// count. Collection problems are logged; a failed metric reset is
    /// returned, but only after the state reset has been issued.
    pub async fn after_test(&self, node_id: &str, failures_before: usize, failures_after: usize) -> HarnessResult<()> {
        if failures_after == failures_before {
            self.collect(node_id).await;
        } else {
            component_error!(Component::Telemetry, "❌ Test failed: {}", node_id);
        }

        let metrics_reset = self.client.reset_metrics().await;

        if let Err(e) = self.client.reset_state().await {
            component_warn!(Component::Telemetry, "⚠️ State reset after {} failed: {}", node_id, e);
        }

        metrics_reset
    }

    async fn collect(&self, node_id: &str) {
        let records = match self.client.fetch_raw_metrics().await {
            Ok(records) => records,
            Err(e) => {
                component_warn!(Component::Telemetry, "⚠️ Could not collect metrics for {}: {}", node_id, e);
                return;
            }
        };

        let records: Vec<_> = records.into_iter().map(|r| r.with_node_id(node_id)).collect();
        match self.report.append(&records) {
            Ok(rows) => {
                component_debug!(Component::Telemetry, "📊 {} metric(s) recorded for {}", rows, node_id);
            }
            Err(e) => {
                component_warn!(Component::Telemetry, "⚠️ Could not write metrics for {}: {}", node_id, e);
            }
        }
    }
}
