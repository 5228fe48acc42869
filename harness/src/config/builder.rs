//! Harness Configuration Builder
//!
//! Provides a flexible builder pattern for constructing harness configurations

use super::client_profile::ClientProfile;
use super::rules::SelectionRules;
use super::{DeploymentMode, HarnessConfig, StateResetMethod};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::HarnessResult;

pub struct HarnessConfigBuilder {
    config: HarnessConfig,
    endpoint: Option<String>,
    client_profile: Option<ClientProfile>,
}

impl HarnessConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: HarnessConfig::default(),
            endpoint: None,
            client_profile: None,
        }
    }

    /// Set emulator base URL
    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set deployment mode (local process or container)
    pub fn mode(mut self, mode: DeploymentMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Enable container mode
    pub fn container_mode(mut self) -> Self {
        self.config.mode = DeploymentMode::Container;
        self
    }

    /// Set API key switching the start command into dev mode
    pub fn api_key(mut self, api_key: Option<String>) -> Self {
        self.config.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Set container image
    pub fn image<S: Into<String>>(mut self, image: S) -> Self {
        self.config.container.image = image.into();
        self
    }

    /// Set local start command (program followed by args)
    pub fn start_command(mut self, command: Vec<String>) -> Self {
        self.config.local.start_command = command;
        self
    }

    /// Set local stop command (program followed by args)
    pub fn stop_command(mut self, command: Vec<String>) -> Self {
        self.config.local.stop_command = command;
        self
    }

    /// Set connection retries after the first probe attempt
    pub fn connect_retries(mut self, retries: usize) -> Self {
        self.config.probe.connect_retries = retries;
        self
    }

    /// Set exponential backoff factor between probe attempts
    pub fn backoff_factor(mut self, factor: Duration) -> Self {
        self.config.probe.backoff_factor = factor;
        self
    }

    /// Set raw metrics report path
    pub fn report_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.report_path = path.into();
        self
    }

    /// Send `{"persistence": true}` with state resets
    pub fn persistence_reset(mut self, enabled: bool) -> Self {
        self.config.state_reset.persistence = enabled;
        self
    }

    /// Set HTTP method for state resets
    pub fn state_reset_method(mut self, method: StateResetMethod) -> Self {
        self.config.state_reset.method = method;
        self
    }

    /// Set timeout for metric and state reset calls
    pub fn reset_timeout(mut self, timeout: Duration) -> Self {
        self.config.state_reset.timeout = timeout;
        self.config.metrics_timeout = timeout;
        self
    }

    /// Set selection rules
    pub fn rules(mut self, rules: SelectionRules) -> Self {
        self.config.rules = rules;
        self
    }

    /// Set client profile handed to test processes
    pub fn client_profile(mut self, profile: ClientProfile) -> Self {
        self.client_profile = Some(profile);
        self
    }

    /// Leave the emulator running after the session
    pub fn keep_running(mut self, keep_running: bool) -> Self {
        self.config.keep_running = keep_running;
        self
    }

    /// Build and validate the configuration
    pub fn build(mut self) -> HarnessResult<HarnessConfig> {
        if let Some(ref endpoint) = self.endpoint {
            self.config.endpoint = Url::parse(endpoint)?;
        }

        // Profile follows the endpoint unless given explicitly
        self.config.client_profile = match self.client_profile {
            Some(profile) => profile,
            None => ClientProfile::new(self.config.endpoint.clone()),
        };

        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for HarnessConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
