//! Trait definitions with mockall annotations for testing
//!
//! These are the seams between the harness logic and the outside world:
//! external commands, the emulator launcher, and the test runner. Each has a
//! real implementation in `runtime` and a generated mock for tests.

use shared::{TestItem, TestOutcome};

use crate::error::HarnessResult;

/// An external command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Build from a program-then-args vector; `None` if it is empty
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone()).args(args.iter().cloned()))
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn envs<I>(mut self, env: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.env.extend(env);
        self
    }

    /// Command line for log and error messages (environment omitted)
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// External command execution abstraction
#[mockall::automock]
#[async_trait::async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run the command to completion and capture its output
    ///
    /// Failing to spawn is an error; a non-zero exit is not, callers inspect
    /// `CommandOutput::status`.
    async fn execute(&self, spec: &CommandSpec) -> HarnessResult<CommandOutput>;
}

/// Starts and stops the emulator for one deployment mode
#[mockall::automock]
#[async_trait::async_trait]
pub trait EmulatorLauncher: Send + Sync {
    /// Short launcher name for diagnostics
    fn name(&self) -> &'static str;

    /// Issue the start request; readiness is checked by the caller
    async fn start(&mut self) -> HarnessResult<()>;

    /// Stop whatever `start` brought up
    async fn stop(&mut self) -> HarnessResult<()>;
}

/// Executes a single collected test item
#[mockall::automock]
#[async_trait::async_trait]
pub trait TestRunner: Send + Sync {
    /// Run one item; `Err` means the runner itself could not run it
    async fn run(&self, item: &TestItem) -> HarnessResult<TestOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_from_argv() {
        let argv = vec!["localstack".to_string(), "start".to_string(), "-d".to_string()];
        let spec = CommandSpec::from_argv(&argv).unwrap();
        assert_eq!(spec.program, "localstack");
        assert_eq!(spec.args, vec!["start", "-d"]);
        assert_eq!(spec.display(), "localstack start -d");
        assert!(CommandSpec::from_argv(&[]).is_none());
    }

    #[test]
    fn test_command_output_success() {
        let ok = CommandOutput {
            status: Some(0),
            ..Default::default()
        };
        let killed = CommandOutput::default();
        assert!(ok.success());
        assert!(!killed.success());
    }

    #[test]
    fn test_mocks_can_be_created() {
        let _executor = MockCommandExecutor::new();
        let _launcher = MockEmulatorLauncher::new();
        let _runner = MockTestRunner::new();
    }
}
