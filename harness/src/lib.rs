//! Emulator test harness
//!
//! Runs an externally collected test suite against a locally running cloud
//! service emulator:
//!
//! - resolves which services a session targets, explicitly or by asking the
//!   emulator,
//! - selects the tests that belong to those services,
//! - starts the emulator when it is not already healthy and stops it at the end,
//! - records the emulator's per-test metrics into a CSV report and resets its
//!   state between tests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use harness::*;
//!
//! # async fn example() -> HarnessResult<()> {
//! let config = HarnessConfig::builder()
//!     .endpoint("http://localhost:4566")
//!     .report_path("target/reports/metric_data_raw.csv")
//!     .build()?;
//!
//! let executor: Arc<dyn CommandExecutor> = Arc::new(RealCommandExecutor::new());
//! let runner = CommandTestRunner::new(
//!     &CommandTestRunner::parse_command_line("python -m pytest"),
//!     &config.client_profile,
//!     executor.clone(),
//! )?;
//!
//! let items = parse_inventory("tests/test_s3.py::test_create_bucket")?;
//! let mut session = TestSession::new(&config, launcher_for(&config, executor), Box::new(runner))?;
//! let summary = session.run(Some("s3"), items).await?;
//! assert!(summary.success());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod runtime;
pub mod selection;
pub mod session;
pub mod telemetry;
pub mod traits;

// Main interfaces - re-exported at crate root for convenience
pub use config::{ClientProfile, DeploymentMode, HarnessConfig, HarnessConfigBuilder, SelectionRules};
pub use error::{HarnessError, HarnessResult};
pub use runtime::{
    CommandTestRunner, EmulatorClient, HealthProber, LifecycleManager, LifecycleState, RealCommandExecutor,
    launcher_for,
};
pub use selection::{
    Resolution, Selection, ServiceCatalogResolver, SkipReason, TestSelector, collect_inventory, load_inventory_file,
    parse_inventory,
};
pub use session::{SessionSummary, TestSession};
pub use telemetry::{MetricReport, TelemetryCollector};
pub use traits::{CommandExecutor, CommandOutput, CommandSpec, EmulatorLauncher, TestRunner};
