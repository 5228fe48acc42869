//! Core types shared by every harness component

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{SharedError, SharedResult};

/// Harness component emitting a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    Prober,
    Lifecycle,
    Catalog,
    Selector,
    Telemetry,
    Runner,
    Session,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Prober => "prober",
            Component::Lifecycle => "lifecycle",
            Component::Catalog => "catalog",
            Component::Selector => "selector",
            Component::Telemetry => "telemetry",
            Component::Runner => "runner",
            Component::Session => "session",
        };
        f.write_str(name)
    }
}

/// One collected test case, identified by its node path
/// (`tests/test_s3.py::TestBucket::test_create`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestItem {
    node_id: String,
    file_name: String,
    package_name: Option<String>,
}

impl TestItem {
    /// Parse a node id into a test item
    pub fn parse(node_id: &str) -> SharedResult<Self> {
        let node_id = node_id.trim();
        if node_id.is_empty() {
            return Err(SharedError::InvalidNodeId {
                input: node_id.to_string(),
            });
        }

        let suite_path = node_id.split("::").next().unwrap_or(node_id);
        let file_name = suite_path.rsplit('/').next().unwrap_or(suite_path);
        if file_name.is_empty() {
            return Err(SharedError::InvalidNodeId {
                input: node_id.to_string(),
            });
        }

        // Second path segment of the full node path, `tests/<package>/...`
        let package_name = node_id.split('/').nth(1).map(str::to_string);

        Ok(Self {
            node_id: node_id.to_string(),
            file_name: file_name.to_string(),
            package_name,
        })
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Name of the suite file owning this test, e.g. `test_s3.py`
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Name of the package directory owning this test, if the path has one
    pub fn package_name(&self) -> Option<&str> {
        self.package_name.as_deref()
    }
}

impl fmt::Display for TestItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.node_id)
    }
}

/// Where a service set came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceSource {
    /// Supplied by the user on the command line
    Explicit,
    /// Reported by the running emulator
    Discovered,
}

/// Ordered set of service identifiers targeted by one session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSet {
    services: Vec<String>,
    source: ServiceSource,
}

impl ServiceSet {
    /// Build a set, dropping empty entries and later duplicates
    pub fn new<I, S>(services: I, source: ServiceSource) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for service in services {
            let service = service.into().trim().to_string();
            if !service.is_empty() && !unique.contains(&service) {
                unique.push(service);
            }
        }
        Self {
            services: unique,
            source,
        }
    }

    pub fn source(&self) -> ServiceSource {
        self.source
    }

    pub fn contains(&self, service: &str) -> bool {
        self.services.iter().any(|s| s == service)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.services.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Display for ServiceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.services.join(","))
    }
}

/// Readiness of the emulator as observed by the last probe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthState {
    Unhealthy,
    Healthy,
}

/// Result of running (or deliberately not running) one test item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestOutcome {
    Passed,
    Failed,
    /// Deselected before running, or the runner found nothing to run
    Skipped,
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestOutcome::Passed => f.write_str("passed"),
            TestOutcome::Failed => f.write_str("failed"),
            TestOutcome::Skipped => f.write_str("skipped"),
        }
    }
}

/// One emulator-side interaction as reported by `/metrics/raw`
///
/// Field values are kept as raw JSON since the emulator reports parameters
/// and response payloads as nested objects.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(default)]
    pub service: serde_json::Value,
    #[serde(default)]
    pub operation: serde_json::Value,
    #[serde(default)]
    pub parameters: serde_json::Value,
    #[serde(default)]
    pub response_code: serde_json::Value,
    #[serde(default)]
    pub response_data: serde_json::Value,
    #[serde(default)]
    pub exception: serde_json::Value,
    #[serde(default)]
    pub origin: serde_json::Value,
    #[serde(default)]
    pub test_node_id: String,
}

impl MetricRecord {
    /// Column names of the raw metrics report, in row order
    pub const HEADER: [&'static str; 8] = [
        "service",
        "operation",
        "parameters",
        "response_code",
        "response_data",
        "exception",
        "origin",
        "test_node_id",
    ];

    pub fn with_node_id(mut self, node_id: &str) -> Self {
        self.test_node_id = node_id.to_string();
        self
    }

    /// Render the record as report cells
    pub fn to_row(&self) -> [String; 8] {
        [
            render_cell(&self.service),
            render_cell(&self.operation),
            render_cell(&self.parameters),
            render_cell(&self.response_code),
            render_cell(&self.response_data),
            render_cell(&self.exception),
            render_cell(&self.origin),
            self.test_node_id.clone(),
        ]
    }
}

fn render_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
