//! Per-test telemetry: metric collection and the raw metrics report

pub mod collector;
pub mod report;

pub use collector::TelemetryCollector;
pub use report::MetricReport;
