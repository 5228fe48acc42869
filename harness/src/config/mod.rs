//! Configuration Management
//!
//! This module provides configuration structures and builders for harness setup.

pub mod builder;
pub mod client_profile;
pub mod harness;
pub mod rules;

// Re-export main types
pub use builder::HarnessConfigBuilder;
pub use client_profile::{ClientProfile, DEFAULT_ACCOUNT_ID};
pub use harness::{
    ContainerLaunchConfig, DeploymentMode, HarnessConfig, LocalLaunchConfig, ProbeConfig,
    StateResetConfig, StateResetMethod, DEFAULT_ENDPOINT, DEFAULT_IMAGE, DEFAULT_REPORT_PATH,
    HEALTH_PATH, METRICS_RAW_PATH, METRICS_RESET_PATH, STATE_RESET_PATH,
};
pub use rules::{PackageOverride, SelectionRules};
