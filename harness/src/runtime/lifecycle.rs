//! Emulator Lifecycle Management
//!
//! Starts the emulator when a probe finds it unhealthy and stops it at the
//! end of the session. Which launcher does the work is fixed at construction.

use crate::error::HarnessResult;
use crate::runtime::health::HealthProber;
use crate::traits::EmulatorLauncher;
use shared::{Component, HealthState, component_error, component_info, component_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    NotStarted,
    Starting,
    Running,
    Stopped,
}

pub struct LifecycleManager {
    prober: HealthProber,
    launcher: Box<dyn EmulatorLauncher>,
    state: LifecycleState,
    starts_issued: usize,
}

impl LifecycleManager {
    pub fn new(prober: HealthProber, launcher: Box<dyn EmulatorLauncher>) -> Self {
        Self {
            prober,
            launcher,
            state: LifecycleState::NotStarted,
            starts_issued: 0,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn prober(&self) -> &HealthProber {
        &self.prober
    }

    /// Number of start requests issued so far
    pub fn starts_issued(&self) -> usize {
        self.starts_issued
    }

    /// Make sure the emulator answers its health check, starting it if needed
    ///
    /// A healthy emulator short-circuits to `Running` without a start request.
    pub async fn ensure_running(&mut self) -> HarnessResult<()> {
        if self.prober.probe().await == HealthState::Healthy {
            if self.state != LifecycleState::Running {
                component_info!(Component::Lifecycle, "✅ Emulator already running");
            }
            self.state = LifecycleState::Running;
            return Ok(());
        }

        self.state = LifecycleState::Starting;
        component_info!(
            Component::Lifecycle,
            "🔄 Emulator not healthy, starting via {} launcher",
            self.launcher.name()
        );

        self.starts_issued += 1;
        self.launcher.start().await?;

        if let Err(e) = self.prober.probe_checked().await {
            component_error!(
                Component::Lifecycle,
                "❌ Emulator not healthy after start via {} launcher: {}",
                self.launcher.name(),
                e
            );
            return Err(e);
        }

        self.state = LifecycleState::Running;
        component_info!(Component::Lifecycle, "✅ Emulator running");
        Ok(())
    }

    /// Best-effort stop; failures are logged and never returned
    pub async fn tear_down(&mut self) {
        if let Err(e) = self.launcher.stop().await {
            component_warn!(Component::Lifecycle, "⚠️ Failed to stop emulator: {}", e);
        }
        self.state = LifecycleState::Stopped;
        component_info!(Component::Lifecycle, "✅ Emulator teardown complete");
    }
}
