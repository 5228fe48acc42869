//! Harness Configuration
//!
//! Static per-session configuration: where the emulator lives, how it is
//! started, how hard to probe it and where telemetry goes.

use super::client_profile::ClientProfile;
use super::rules::SelectionRules;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::{HarnessError, HarnessResult};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:4566";
pub const HEALTH_PATH: &str = "/_localstack/health";
pub const METRICS_RAW_PATH: &str = "/metrics/raw";
pub const METRICS_RESET_PATH: &str = "/metrics/reset";
pub const STATE_RESET_PATH: &str = "/_localstack/state/reset";
pub const DEFAULT_REPORT_PATH: &str = "target/reports/metric_data_raw.csv";
pub const DEFAULT_IMAGE: &str = "localstack/localstack";

/// How the emulator is brought up when it is not already healthy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DeploymentMode {
    /// Local binary started through its own process manager (`localstack start -d`)
    #[default]
    Local,
    /// Container started through the container runtime CLI
    Container,
}

/// Connection-retry budget for health probes
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    /// Retries after the first attempt, connection errors only
    pub connect_retries: usize,
    /// Delay before retry n (n >= 2) is `backoff_factor * 2^(n-1)`
    pub backoff_factor: Duration,
    pub max_backoff: Duration,
    pub request_timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            connect_retries: 3,
            backoff_factor: Duration::from_secs(2),
            max_backoff: Duration::from_secs(120),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ProbeConfig {
    /// Total number of connection attempts a probe may make
    pub fn max_attempts(&self) -> usize {
        self.connect_retries + 1
    }

    /// Delay slept before the given retry (1-based)
    pub fn backoff_for_retry(&self, retry: usize) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }
        let exponent = u32::try_from(retry - 1).unwrap_or(u32::MAX).min(16);
        self.backoff_factor
            .saturating_mul(2u32.saturating_pow(exponent))
            .min(self.max_backoff)
    }
}

/// Local process launcher settings
#[derive(Debug, Clone, PartialEq)]
pub struct LocalLaunchConfig {
    pub start_command: Vec<String>,
    pub stop_command: Vec<String>,
}

impl Default for LocalLaunchConfig {
    fn default() -> Self {
        Self {
            start_command: vec!["localstack".to_string(), "start".to_string(), "-d".to_string()],
            stop_command: vec!["localstack".to_string(), "stop".to_string()],
        }
    }
}

/// Container launcher settings
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerLaunchConfig {
    pub runtime: String,
    pub image: String,
    pub ports: Vec<String>,
    pub volumes: Vec<String>,
}

impl Default for ContainerLaunchConfig {
    fn default() -> Self {
        Self {
            runtime: "docker".to_string(),
            image: DEFAULT_IMAGE.to_string(),
            ports: vec!["4566:4566".to_string(), "4510-4559:4510-4559".to_string()],
            volumes: vec!["/var/run/docker.sock:/var/run/docker.sock".to_string()],
        }
    }
}

/// HTTP method used for the resource-state reset call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StateResetMethod {
    #[default]
    Post,
    Delete,
}

/// Resource-state reset issued after every test
#[derive(Debug, Clone, PartialEq)]
pub struct StateResetConfig {
    pub method: StateResetMethod,
    /// Send `{"persistence": true}` with the reset request
    pub persistence: bool,
    pub timeout: Duration,
}

impl Default for StateResetConfig {
    fn default() -> Self {
        Self {
            method: StateResetMethod::Post,
            persistence: false,
            timeout: Duration::from_secs(90),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub endpoint: Url,
    pub mode: DeploymentMode,
    pub api_key: Option<String>,
    pub probe: ProbeConfig,
    pub local: LocalLaunchConfig,
    pub container: ContainerLaunchConfig,
    pub state_reset: StateResetConfig,
    pub metrics_timeout: Duration,
    pub report_path: PathBuf,
    pub rules: SelectionRules,
    pub client_profile: ClientProfile,
    pub keep_running: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let endpoint = default_endpoint();
        Self {
            client_profile: ClientProfile::new(endpoint.clone()),
            endpoint,
            mode: DeploymentMode::default(),
            api_key: None,
            probe: ProbeConfig::default(),
            local: LocalLaunchConfig::default(),
            container: ContainerLaunchConfig::default(),
            state_reset: StateResetConfig::default(),
            metrics_timeout: Duration::from_secs(90),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            rules: SelectionRules::default(),
            keep_running: false,
        }
    }
}

impl HarnessConfig {
    /// Create a new builder
    pub fn builder() -> crate::config::builder::HarnessConfigBuilder {
        crate::config::builder::HarnessConfigBuilder::new()
    }

    /// Resolve a control-plane path against the emulator endpoint
    ///
    /// Paths are relative to the endpoint, so a prefix such as
    /// `http://gateway:8080/localstack` is kept.
    pub fn url_for(&self, path: &str) -> HarnessResult<Url> {
        let mut base = self.endpoint.clone();
        if !base.path().ends_with('/') {
            let prefixed = format!("{}/", base.path());
            base.set_path(&prefixed);
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }

    /// Environment flags passed to the emulator start command
    pub fn launch_environment(&self) -> Vec<(String, String)> {
        let mut env = vec![
            ("DNS_ADDRESS".to_string(), "127.0.0.1".to_string()),
            ("DISABLE_EVENTS".to_string(), "1".to_string()),
        ];
        if let Some(ref key) = self.api_key {
            env.push(("EXTENSION_DEV_MODE".to_string(), "1".to_string()));
            env.push(("LOCALSTACK_API_KEY".to_string(), key.clone()));
        }
        env
    }

    /// Check the configuration is usable before a session starts
    pub fn validate(&self) -> HarnessResult<()> {
        if !matches!(self.endpoint.scheme(), "http" | "https") {
            return Err(HarnessError::config(format!(
                "endpoint scheme must be http or https, got '{}'",
                self.endpoint.scheme()
            )));
        }
        match self.mode {
            DeploymentMode::Local if self.local.start_command.is_empty() => {
                Err(HarnessError::config("local start command is empty"))
            }
            DeploymentMode::Container if self.container.image.trim().is_empty() => {
                Err(HarnessError::config("container image is empty"))
            }
            _ => Ok(()),
        }
    }
}

pub(crate) fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL")
}
