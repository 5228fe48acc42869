//! Test session driver
//!
//! One session owns everything with session scope: the emulator lifecycle,
//! the raw metrics report and the failure counter the telemetry collector
//! compares against after each test.

use std::fmt;

use crate::config::HarnessConfig;
use crate::error::HarnessResult;
use crate::runtime::{EmulatorClient, HealthProber, LifecycleManager, LifecycleState};
use crate::selection::{Selection, ServiceCatalogResolver, SkipReason, TestSelector};
use crate::telemetry::{MetricReport, TelemetryCollector};
use crate::traits::{EmulatorLauncher, TestRunner};
use shared::logging::{log_error, log_shutdown, log_startup, log_success};
use shared::{Component, TestItem, TestOutcome, component_info, component_warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub passed: usize,
    pub failed: usize,
    /// Items the runner ran but reported as skipped
    pub skipped: usize,
    /// Items skipped by selection, each with its reason
    pub deselected: Vec<(TestItem, SkipReason)>,
}

impl SessionSummary {
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, outcome: TestOutcome) {
        match outcome {
            TestOutcome::Passed => self.passed += 1,
            TestOutcome::Failed => self.failed += 1,
            TestOutcome::Skipped => self.skipped += 1,
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} skipped, {} deselected",
            self.passed,
            self.failed,
            self.skipped,
            self.deselected.len()
        )
    }
}

pub struct TestSession {
    lifecycle: LifecycleManager,
    resolver: ServiceCatalogResolver,
    collector: TelemetryCollector,
    runner: Box<dyn TestRunner>,
    keep_running: bool,
    failures: usize,
}

impl TestSession {
    /// Set up a session; truncates the report and writes its header
    pub fn new(
        config: &HarnessConfig,
        launcher: Box<dyn EmulatorLauncher>,
        runner: Box<dyn TestRunner>,
    ) -> HarnessResult<Self> {
        let client = EmulatorClient::new(config)?;
        let prober = HealthProber::new(client.clone(), config.probe.clone());
        let report = MetricReport::create(&config.report_path)?;

        Ok(Self {
            lifecycle: LifecycleManager::new(prober, launcher),
            resolver: ServiceCatalogResolver::new(config.rules.clone()),
            collector: TelemetryCollector::new(client, report),
            runner,
            keep_running: config.keep_running,
            failures: 0,
        })
    }

    pub fn lifecycle(&self) -> &LifecycleManager {
        &self.lifecycle
    }

    pub fn report(&self) -> &MetricReport {
        self.collector.report()
    }

    /// Resolve the target services and partition `items`
    ///
    /// Only contacts the emulator when services have to be discovered.
    pub async fn select(&mut self, services_override: Option<&str>, items: Vec<TestItem>) -> HarnessResult<Selection> {
        let resolution = self.resolver.resolve(services_override, &mut self.lifecycle).await?;
        Ok(TestSelector::select(items, &resolution.services, &resolution.rules))
    }

    /// Run a whole session and tear the emulator down afterwards
    ///
    /// Teardown happens on fatal errors too.
    pub async fn run(&mut self, services_override: Option<&str>, items: Vec<TestItem>) -> HarnessResult<SessionSummary> {
        log_startup(Component::Session, &format!("test session with {} collected item(s)", items.len()));

        let result = self.run_inner(services_override, items).await;
        match &result {
            Ok(summary) if summary.success() => log_success(Component::Session, &format!("Session finished: {summary}")),
            Ok(summary) => {
                component_warn!(Component::Session, "⚠️ Session finished with failures: {}", summary);
            }
            Err(e) => log_error(Component::Session, "Session", e),
        }

        self.shutdown().await;
        result
    }

    async fn run_inner(&mut self, services_override: Option<&str>, items: Vec<TestItem>) -> HarnessResult<SessionSummary> {
        self.lifecycle.ensure_running().await?;

        let selection = self.select(services_override, items).await?;
        for (item, reason) in &selection.deselected {
            component_info!(Component::Session, "{} {} ({})", item, TestOutcome::Skipped, reason);
        }

        let mut summary = SessionSummary {
            deselected: selection.deselected,
            ..SessionSummary::default()
        };

        for item in &selection.selected {
            let outcome = self.run_test(item).await?;
            summary.record(outcome);
        }

        Ok(summary)
    }

    /// Run one item wrapped by the telemetry record/reset cycle
    pub async fn run_test(&mut self, item: &TestItem) -> HarnessResult<TestOutcome> {
        let failures_before = self.failures;

        let outcome = self.runner.run(item).await?;
        if outcome == TestOutcome::Failed {
            self.failures += 1;
        }
        component_info!(Component::Session, "{} {}", item, outcome);

        self.collector
            .after_test(item.node_id(), failures_before, self.failures)
            .await?;
        Ok(outcome)
    }

    /// Stop the emulator unless asked to keep it or it was never touched
    pub async fn shutdown(&mut self) {
        if self.keep_running {
            component_info!(Component::Session, "Leaving emulator running");
            return;
        }
        if self.lifecycle.state() == LifecycleState::NotStarted {
            return;
        }

        log_shutdown(Component::Session, "tearing down emulator");
        self.lifecycle.tear_down().await;
    }
}
