//! External test runner
//!
//! Runs one collected item per process (`python -m pytest <node id>`), with
//! the client profile rendered into the process environment.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ClientProfile;
use crate::error::{HarnessError, HarnessResult};
use crate::traits::{CommandExecutor, CommandSpec, TestRunner};
use shared::{Component, TestItem, TestOutcome, component_debug, component_warn};

/// pytest exit code when the node id selected nothing
const EXIT_NO_TESTS_COLLECTED: i32 = 5;

/// Output lines kept in the log when a test fails
const FAILURE_TAIL_LINES: usize = 20;

pub struct CommandTestRunner {
    base: CommandSpec,
    executor: Arc<dyn CommandExecutor>,
}

impl CommandTestRunner {
    /// `argv` is the runner command without the node id, e.g. `python -m pytest -q`
    pub fn new(argv: &[String], profile: &ClientProfile, executor: Arc<dyn CommandExecutor>) -> HarnessResult<Self> {
        let base = CommandSpec::from_argv(argv)
            .ok_or_else(|| HarnessError::config("runner command is empty"))?
            .envs(profile.environment());
        Ok(Self { base, executor })
    }

    /// Split a shell-style command line on whitespace
    pub fn parse_command_line(command: &str) -> Vec<String> {
        command.split_whitespace().map(str::to_string).collect()
    }
}

#[async_trait]
impl TestRunner for CommandTestRunner {
    async fn run(&self, item: &TestItem) -> HarnessResult<TestOutcome> {
        let spec = self.base.clone().arg(item.node_id());
        let output = self.executor.execute(&spec).await?;

        let outcome = match output.status {
            Some(0) => TestOutcome::Passed,
            Some(EXIT_NO_TESTS_COLLECTED) => TestOutcome::Skipped,
            _ => TestOutcome::Failed,
        };

        if outcome == TestOutcome::Failed {
            let lines: Vec<&str> = output.stdout.lines().collect();
            let tail = lines[lines.len().saturating_sub(FAILURE_TAIL_LINES)..].join("\n");
            component_warn!(
                Component::Runner,
                "❌ {} exited with {:?}\n{}\n{}",
                item,
                output.status,
                tail,
                output.stderr.trim()
            );
        } else {
            component_debug!(Component::Runner, "{} -> {}", item, outcome);
        }

        Ok(outcome)
    }
}
