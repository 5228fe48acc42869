//! Emulator control-plane client
//!
//! Typed HTTP access to the emulator's health, metrics and state-reset
//! endpoints. Cheap to clone; all clones share one connection pool.

use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::{
    HEALTH_PATH, HarnessConfig, METRICS_RAW_PATH, METRICS_RESET_PATH, STATE_RESET_PATH,
    StateResetConfig, StateResetMethod,
};
use crate::error::{HarnessError, HarnessResult};
use shared::MetricRecord;

/// Capability report returned by the health endpoint
#[derive(Deserialize, Debug)]
pub struct HealthReport {
    pub services: serde_json::Map<String, serde_json::Value>,
}

/// Body of `GET /metrics/raw`
#[derive(Deserialize, Debug)]
pub struct RawMetricsResponse {
    pub metrics: Vec<MetricRecord>,
}

#[derive(Clone, Debug)]
pub struct EmulatorClient {
    health_url: Url,
    metrics_raw_url: Url,
    metrics_reset_url: Url,
    state_reset_url: Url,
    metrics_timeout: Duration,
    state_reset: StateResetConfig,
    client: reqwest::Client,
}

impl EmulatorClient {
    pub fn new(config: &HarnessConfig) -> HarnessResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.probe.request_timeout)
            .build()
            .map_err(|e| HarnessError::config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            health_url: config.url_for(HEALTH_PATH)?,
            metrics_raw_url: config.url_for(METRICS_RAW_PATH)?,
            metrics_reset_url: config.url_for(METRICS_RESET_PATH)?,
            state_reset_url: config.url_for(STATE_RESET_PATH)?,
            metrics_timeout: config.metrics_timeout,
            state_reset: config.state_reset.clone(),
            client,
        })
    }

    pub fn health_url(&self) -> &Url {
        &self.health_url
    }

    /// Single GET against the health endpoint, returning the HTTP status
    pub async fn health_status(&self) -> HarnessResult<u16> {
        let response = self
            .client
            .get(self.health_url.clone())
            .send()
            .await
            .map_err(|e| HarnessError::from_request("health check", self.health_url.as_str(), e))?;

        Ok(response.status().as_u16())
    }

    /// Fetch and parse the capability report
    pub async fn health_report(&self) -> HarnessResult<HealthReport> {
        let response = self
            .client
            .get(self.health_url.clone())
            .send()
            .await
            .map_err(|e| HarnessError::from_request("health report", self.health_url.as_str(), e))?;

        if !response.status().is_success() {
            return Err(HarnessError::UnexpectedStatus {
                operation: "health report".to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| HarnessError::from_request("health report", self.health_url.as_str(), e))?;

        serde_json::from_slice::<HealthReport>(&body).map_err(|e| HarnessError::InvalidHealthReport {
            message: e.to_string(),
        })
    }

    /// Fetch all metrics the emulator buffered since the last reset
    pub async fn fetch_raw_metrics(&self) -> HarnessResult<Vec<MetricRecord>> {
        let response = self
            .client
            .get(self.metrics_raw_url.clone())
            .timeout(self.metrics_timeout)
            .send()
            .await
            .map_err(|e| HarnessError::from_request("metrics fetch", self.metrics_raw_url.as_str(), e))?;

        if !response.status().is_success() {
            return Err(HarnessError::UnexpectedStatus {
                operation: "metrics fetch".to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| HarnessError::from_request("metrics fetch", self.metrics_raw_url.as_str(), e))?;

        let parsed: RawMetricsResponse = serde_json::from_slice(&body)?;
        Ok(parsed.metrics)
    }

    /// Clear the emulator's metric buffer; anything but 200 is a failure
    pub async fn reset_metrics(&self) -> HarnessResult<()> {
        let response = self
            .client
            .delete(self.metrics_reset_url.clone())
            .timeout(self.metrics_timeout)
            .send()
            .await
            .map_err(|e| HarnessError::MetricsResetFailed {
                message: format!("DELETE {} failed: {e}", self.metrics_reset_url),
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(HarnessError::MetricsResetFailed {
                message: format!("DELETE {} returned HTTP {status}", self.metrics_reset_url),
            });
        }
        Ok(())
    }

    /// Drop all emulated resources
    pub async fn reset_state(&self) -> HarnessResult<()> {
        let request = match self.state_reset.method {
            StateResetMethod::Post => self.client.post(self.state_reset_url.clone()),
            StateResetMethod::Delete => self.client.delete(self.state_reset_url.clone()),
        };

        let request = if self.state_reset.persistence {
            // .json() also sets content-type: application/json
            request.json(&serde_json::json!({ "persistence": true }))
        } else {
            request
        };

        let response = request
            .timeout(self.state_reset.timeout)
            .send()
            .await
            .map_err(|e| HarnessError::from_request("state reset", self.state_reset_url.as_str(), e))?;

        if !response.status().is_success() {
            return Err(HarnessError::UnexpectedStatus {
                operation: "state reset".to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}
