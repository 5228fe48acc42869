//! Main entry point for the harness binary
//!
//! Wires the real command executor, launcher and test runner into a session
//! and maps the session result onto the process exit code.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

use harness::config::{DEFAULT_ACCOUNT_ID, DEFAULT_ENDPOINT, StateResetMethod};
use harness::{
    ClientProfile, CommandExecutor, CommandTestRunner, DeploymentMode, HarnessConfig, RealCommandExecutor, Selection, TestSession,
    collect_inventory, launcher_for, load_inventory_file,
};
use shared::{Component, TestItem, component_info, logging};

/// Runs a collected test suite against a local cloud service emulator
#[derive(Parser)]
#[command(name = "harness")]
#[command(about = "Runs an external test suite against a local cloud service emulator")]
pub struct Args {
    /// Comma separated services to test; absent or "all" asks the emulator
    #[arg(long)]
    pub services: Option<String>,

    /// File with one test node id per line ("-" reads stdin)
    #[arg(long, required_unless_present = "collect_cmd", conflicts_with = "collect_cmd")]
    pub inventory: Option<PathBuf>,

    /// Command printing test node ids, e.g. "python -m pytest --collect-only -q tests"
    #[arg(long)]
    pub collect_cmd: Option<String>,

    /// Command running a single test; the node id is appended
    #[arg(long, default_value = "python -m pytest")]
    pub runner_cmd: String,

    /// Emulator endpoint
    #[arg(long, env = "TEST_SERVER_MODE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// How to start the emulator when it is not running
    #[arg(long, value_enum, default_value_t = DeploymentMode::Local)]
    pub mode: DeploymentMode,

    /// Command starting the emulator (local mode only)
    #[arg(long)]
    pub start_cmd: Option<String>,

    /// Command stopping the emulator (local mode only)
    #[arg(long)]
    pub stop_cmd: Option<String>,

    /// Container image (container mode only)
    #[arg(long)]
    pub image: Option<String>,

    /// Raw metrics report path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Also reset persisted state between tests
    #[arg(long)]
    pub persistence_reset: bool,

    /// HTTP method of the state reset call
    #[arg(long, value_enum, default_value_t = StateResetMethod::Post)]
    pub state_reset_method: StateResetMethod,

    /// Timeout in seconds for metric and state reset calls
    #[arg(long, default_value = "90")]
    pub reset_timeout_secs: u64,

    /// Account id test clients authenticate as
    #[arg(long, default_value = DEFAULT_ACCOUNT_ID)]
    pub account_id: String,

    /// Print the selection and exit without running tests
    #[arg(long)]
    pub collect_only: bool,

    /// Leave the emulator running after the session
    #[arg(long)]
    pub keep_running: bool,

    /// Emulator API key; starts the emulator in dev mode
    #[arg(long, env = "LOCALSTACK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    fn to_config(&self) -> harness::HarnessResult<HarnessConfig> {
        let mut builder = HarnessConfig::builder()
            .endpoint(self.endpoint.clone())
            .mode(self.mode)
            .api_key(self.api_key.clone())
            .persistence_reset(self.persistence_reset)
            .state_reset_method(self.state_reset_method)
            .reset_timeout(Duration::from_secs(self.reset_timeout_secs))
            .keep_running(self.keep_running);

        if let Some(command) = &self.start_cmd {
            builder = builder.start_command(CommandTestRunner::parse_command_line(command));
        }
        if let Some(command) = &self.stop_cmd {
            builder = builder.stop_command(CommandTestRunner::parse_command_line(command));
        }
        if let Some(image) = &self.image {
            builder = builder.image(image.clone());
        }
        if let Some(report) = &self.report {
            builder = builder.report_path(report.clone());
        }

        let mut config = builder.build()?;
        // Profile follows the validated endpoint
        config.client_profile = ClientProfile::new(config.endpoint.clone()).with_account_id(self.account_id.clone());
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // .env must be loaded before clap reads env-backed arguments
    dotenv::dotenv().ok();
    let args = Args::parse();

    logging::init_tracing_with_level(Some(&args.log_level));
    logging::log_startup(Component::Session, "emulator test harness");

    let config = args.to_config().context("invalid configuration")?;
    let executor: Arc<dyn CommandExecutor> = Arc::new(RealCommandExecutor::new());

    let items = load_items(&args, executor.as_ref()).await?;

    let runner = CommandTestRunner::new(
        &CommandTestRunner::parse_command_line(&args.runner_cmd),
        &config.client_profile,
        executor.clone(),
    )?;
    let mut session = TestSession::new(&config, launcher_for(&config, executor), Box::new(runner))
        .context("failed to set up test session")?;

    if args.collect_only {
        let selection = session.select(args.services.as_deref(), items).await;
        session.shutdown().await;
        print_selection(&selection?);
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = tokio::select! {
        result = session.run(args.services.as_deref(), items) => Some(result),
        _ = signal::ctrl_c() => None,
    };

    let Some(result) = outcome else {
        logging::log_shutdown(Component::Session, "Received Ctrl+C signal");
        session.shutdown().await;
        return Ok(ExitCode::from(130));
    };

    let summary = result.context("test session aborted")?;
    component_info!(Component::Session, "🏁 {}", summary);
    Ok(if summary.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn load_items(args: &Args, executor: &dyn CommandExecutor) -> anyhow::Result<Vec<TestItem>> {
    let items = match (&args.inventory, &args.collect_cmd) {
        (Some(path), _) => load_inventory_file(path).await?,
        (None, Some(command)) => collect_inventory(executor, &CommandTestRunner::parse_command_line(command)).await?,
        (None, None) => anyhow::bail!("either --inventory or --collect-cmd is required"),
    };
    Ok(items)
}

fn print_selection(selection: &Selection) {
    for item in &selection.selected {
        println!("{item}");
    }
    for (item, reason) in &selection.deselected {
        eprintln!("deselected {item}: {reason}");
    }
    eprintln!(
        "{} selected, {} deselected",
        selection.selected.len(),
        selection.deselected.len()
    );
}
