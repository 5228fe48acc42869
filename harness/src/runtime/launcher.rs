//! Emulator launchers
//!
//! One launcher per deployment mode. Both only issue the start/stop request;
//! readiness is the lifecycle manager's concern.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{ContainerLaunchConfig, DeploymentMode, HarnessConfig, LocalLaunchConfig};
use crate::error::{HarnessError, HarnessResult};
use crate::traits::{CommandExecutor, CommandOutput, CommandSpec, EmulatorLauncher};
use shared::{Component, component_debug, component_info, component_warn};

/// Build the launcher for the configured deployment mode
pub fn launcher_for(config: &HarnessConfig, executor: Arc<dyn CommandExecutor>) -> Box<dyn EmulatorLauncher> {
    let env = config.launch_environment();
    match config.mode {
        DeploymentMode::Local => Box::new(LocalProcessLauncher::new(config.local.clone(), env, executor)),
        DeploymentMode::Container => Box::new(ContainerLauncher::new(config.container.clone(), env, executor)),
    }
}

fn ensure_success(launcher: &str, spec: &CommandSpec, output: CommandOutput) -> HarnessResult<CommandOutput> {
    if output.success() {
        Ok(output)
    } else {
        Err(HarnessError::launcher(
            launcher,
            format!(
                "'{}' exited with status {:?}: {}",
                spec.display(),
                output.status,
                output.stderr.trim()
            ),
        ))
    }
}

/// Starts the emulator through its own CLI (`localstack start -d`)
pub struct LocalProcessLauncher {
    config: LocalLaunchConfig,
    env: Vec<(String, String)>,
    executor: Arc<dyn CommandExecutor>,
}

impl LocalProcessLauncher {
    pub fn new(config: LocalLaunchConfig, env: Vec<(String, String)>, executor: Arc<dyn CommandExecutor>) -> Self {
        Self { config, env, executor }
    }
}

#[async_trait]
impl EmulatorLauncher for LocalProcessLauncher {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn start(&mut self) -> HarnessResult<()> {
        let spec = CommandSpec::from_argv(&self.config.start_command)
            .ok_or_else(|| HarnessError::config("local start command is empty"))?
            .envs(self.env.clone());

        component_info!(Component::Lifecycle, "🚀 Starting emulator: {}", spec.display());
        let output = self.executor.execute(&spec).await?;
        ensure_success(self.name(), &spec, output)?;
        Ok(())
    }

    async fn stop(&mut self) -> HarnessResult<()> {
        let Some(spec) = CommandSpec::from_argv(&self.config.stop_command) else {
            component_debug!(Component::Lifecycle, "No local stop command configured");
            return Ok(());
        };

        component_info!(Component::Lifecycle, "🛑 Stopping emulator: {}", spec.display());
        let output = self.executor.execute(&spec).await?;
        ensure_success(self.name(), &spec, output)?;
        Ok(())
    }
}

/// Runs the emulator image through the container runtime CLI
///
/// The id of the started container is owned by this launcher, so the session
/// that started it is the one that stops it.
pub struct ContainerLauncher {
    config: ContainerLaunchConfig,
    env: Vec<(String, String)>,
    executor: Arc<dyn CommandExecutor>,
    container_id: Option<String>,
}

impl ContainerLauncher {
    pub fn new(
        config: ContainerLaunchConfig,
        env: Vec<(String, String)>,
        executor: Arc<dyn CommandExecutor>,
    ) -> Self {
        Self {
            config,
            env,
            executor,
            container_id: None,
        }
    }

    pub fn container_id(&self) -> Option<&str> {
        self.container_id.as_deref()
    }

    fn runtime_command(&self) -> CommandSpec {
        CommandSpec::new(self.config.runtime.clone())
    }

    async fn run_checked(&self, spec: CommandSpec) -> HarnessResult<CommandOutput> {
        let output = self.executor.execute(&spec).await?;
        ensure_success(self.name(), &spec, output)
    }

    async fn ping(&self) -> HarnessResult<()> {
        self.run_checked(self.runtime_command().arg("info")).await.map(|_| ())
    }

    async fn image_present(&self) -> HarnessResult<bool> {
        let spec = self
            .runtime_command()
            .args(["image", "inspect", self.config.image.as_str()]);
        // Non-zero exit means the image is missing locally
        Ok(self.executor.execute(&spec).await?.success())
    }

    fn run_command(&self) -> CommandSpec {
        let mut spec = self.runtime_command().args(["run", "-d", "--rm"]);
        for port in &self.config.ports {
            spec = spec.arg("-p").arg(port.clone());
        }
        for volume in &self.config.volumes {
            spec = spec.arg("-v").arg(volume.clone());
        }
        // Name-only `-e KEY`: docker reads the value from its own environment,
        // so values never appear in argv or in `display()`
        for (key, _) in &self.env {
            spec = spec.arg("-e").arg(key.clone());
        }
        spec.arg(self.config.image.clone()).envs(self.env.clone())
    }
}

#[async_trait]
impl EmulatorLauncher for ContainerLauncher {
    fn name(&self) -> &'static str {
        "container"
    }

    async fn start(&mut self) -> HarnessResult<()> {
        self.ping().await?;

        if !self.image_present().await? {
            component_info!(Component::Lifecycle, "📥 Pulling image {}", self.config.image);
            self.run_checked(self.runtime_command().args(["pull", self.config.image.as_str()]))
                .await?;
        }

        let output = self.run_checked(self.run_command()).await?;
        let container_id = output
            .stdout
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .ok_or_else(|| HarnessError::launcher(self.name(), "run did not report a container id"))?
            .to_string();

        component_info!(
            Component::Lifecycle,
            "🐳 Started container {} from {}",
            container_id,
            self.config.image
        );
        self.container_id = Some(container_id);
        Ok(())
    }

    async fn stop(&mut self) -> HarnessResult<()> {
        let Some(container_id) = self.container_id.take() else {
            component_warn!(Component::Lifecycle, "⚠️ No container started by this session, nothing to stop");
            return Ok(());
        };

        component_info!(Component::Lifecycle, "🛑 Stopping container {}", container_id);
        self.run_checked(self.runtime_command().args(["stop", container_id.as_str()]))
            .await?;
        Ok(())
    }
}
