//! Health Prober
//!
//! Bounded-retry readiness check against the emulator's health endpoint.
//! Only connection failures are retried; any HTTP response settles the probe.

use std::future::Future;
use tokio::time::sleep;

use crate::config::ProbeConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::runtime::emulator_client::EmulatorClient;
use shared::{Component, HealthState, component_debug, component_warn};

/// Run `operation` until it succeeds, fails with a non-connection error, or
/// the connection budget in `config` is spent. `operation` receives the
/// 1-based attempt number.
pub async fn retry_on_connect<T, F, Fut>(config: &ProbeConfig, mut operation: F) -> HarnessResult<T>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = HarnessResult<T>>,
{
    let max_attempts = config.max_attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_connection() && attempt < max_attempts => {
                let delay = config.backoff_for_retry(attempt);
                component_warn!(
                    Component::Prober,
                    "🔁 Connection attempt {}/{} failed, retrying in {:?}: {}",
                    attempt,
                    max_attempts,
                    delay,
                    err
                );
                sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthProber {
    client: EmulatorClient,
    config: ProbeConfig,
}

impl HealthProber {
    pub fn new(client: EmulatorClient, config: ProbeConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &EmulatorClient {
        &self.client
    }

    /// Error reported when the emulator cannot be reached within the budget
    pub fn not_healthy(&self) -> HarnessError {
        HarnessError::EmulatorNotHealthy {
            endpoint: self.client.health_url().to_string(),
            attempts: self.config.max_attempts(),
        }
    }

    /// Probe and report the observed state
    pub async fn probe(&self) -> HealthState {
        match self.probe_checked().await {
            Ok(()) => HealthState::Healthy,
            Err(e) => {
                component_debug!(Component::Prober, "Emulator unhealthy: {}", e);
                HealthState::Unhealthy
            }
        }
    }

    /// Probe, returning why the emulator is not healthy on failure
    pub async fn probe_checked(&self) -> HarnessResult<()> {
        let client = &self.client;
        let status = retry_on_connect(&self.config, move |_| client.health_status())
            .await
            .map_err(|e| if e.is_connection() { self.not_healthy() } else { e })?;

        if (200..300).contains(&status) {
            component_debug!(Component::Prober, "💚 Emulator healthy at {}", client.health_url());
            Ok(())
        } else {
            Err(HarnessError::UnexpectedStatus {
                operation: "health check".to_string(),
                status,
            })
        }
    }
}
