//! Real command execution on top of `tokio::process`

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{HarnessError, HarnessResult};
use crate::traits::{CommandExecutor, CommandOutput, CommandSpec};
use shared::{Component, component_debug};

#[derive(Debug, Clone, Default)]
pub struct RealCommandExecutor;

impl RealCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for RealCommandExecutor {
    async fn execute(&self, spec: &CommandSpec) -> HarnessResult<CommandOutput> {
        component_debug!(Component::Runner, "▶️ Running: {}", spec.display());

        let output = Command::new(&spec.program)
            .args(&spec.args)
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| HarnessError::CommandFailed {
                command: spec.display(),
                status: None,
                stderr: format!("failed to spawn: {e}"),
            })?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout_and_status() {
        let executor = RealCommandExecutor::new();
        let spec = CommandSpec::new("sh").args(["-c", "echo hello; exit 3"]);

        let output = executor.execute(&spec).await.unwrap();
        assert_eq!(output.status, Some(3));
        assert_eq!(output.stdout.trim(), "hello");
        assert!(!output.success());
    }

    #[tokio::test]
    async fn test_passes_environment() {
        let executor = RealCommandExecutor::new();
        let spec = CommandSpec::new("sh")
            .args(["-c", "printf %s \"$HARNESS_PROBE\""])
            .envs([("HARNESS_PROBE".to_string(), "on".to_string())]);

        let output = executor.execute(&spec).await.unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "on");
    }

    #[tokio::test]
    async fn test_missing_program_is_error() {
        let executor = RealCommandExecutor::new();
        let spec = CommandSpec::new("definitely-not-a-real-binary-12345");
        let err = executor.execute(&spec).await.unwrap_err();
        assert!(matches!(err, HarnessError::CommandFailed { status: None, .. }));
    }
}
