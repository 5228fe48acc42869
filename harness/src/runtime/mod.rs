//! Runtime Management
//!
//! This module handles the emulator side of a session: control-plane calls,
//! health probing, launching and lifecycle, and running external commands.

pub mod emulator_client;
pub mod executor;
pub mod health;
pub mod launcher;
pub mod lifecycle;
pub mod runner;

// Re-export main types
pub use emulator_client::{EmulatorClient, HealthReport, RawMetricsResponse};
pub use executor::RealCommandExecutor;
pub use health::{HealthProber, retry_on_connect};
pub use launcher::{ContainerLauncher, LocalProcessLauncher, launcher_for};
pub use lifecycle::{LifecycleManager, LifecycleState};
pub use runner::CommandTestRunner;
