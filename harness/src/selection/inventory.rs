//! Test inventory loading
//!
//! The harness never discovers tests itself. It reads node ids produced by an
//! external collector, either from a file, stdin, or by running the collect
//! command directly.

use std::path::Path;
use tokio::io::AsyncReadExt;

use crate::error::{HarnessError, HarnessResult};
use crate::traits::{CommandExecutor, CommandSpec};
use shared::{Component, TestItem, component_debug, component_info};

/// Parse collector output into test items
///
/// Only lines that look like node ids (`path::name`) are kept; blank lines and
/// collector chatter such as `12 tests collected in 0.3s` are skipped.
pub fn parse_inventory(text: &str) -> HarnessResult<Vec<TestItem>> {
    let mut items = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || !line.contains("::") {
            continue;
        }
        items.push(TestItem::parse(line)?);
    }
    Ok(items)
}

/// Read a node-id list from `path`; `-` reads stdin
pub async fn load_inventory_file(path: &Path) -> HarnessResult<Vec<TestItem>> {
    let text = if path == Path::new("-") {
        let mut buffer = String::new();
        tokio::io::stdin().read_to_string(&mut buffer).await?;
        buffer
    } else {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| HarnessError::inventory(format!("failed to read {}: {e}", path.display())))?
    };

    let items = parse_inventory(&text)?;
    component_info!(Component::Selector, "📋 Loaded {} test item(s) from {}", items.len(), path.display());
    Ok(items)
}

/// Run the external collect command and parse its stdout
pub async fn collect_inventory(executor: &dyn CommandExecutor, argv: &[String]) -> HarnessResult<Vec<TestItem>> {
    let spec = CommandSpec::from_argv(argv).ok_or_else(|| HarnessError::config("collect command is empty"))?;

    component_debug!(Component::Selector, "Collecting tests: {}", spec.display());
    let output = executor.execute(&spec).await?;
    if !output.success() {
        return Err(HarnessError::CommandFailed {
            command: spec.display(),
            status: output.status,
            stderr: output.stderr.trim().to_string(),
        });
    }

    let items = parse_inventory(&output.stdout)?;
    if items.is_empty() {
        return Err(HarnessError::inventory(format!("'{}' collected no tests", spec.display())));
    }

    component_info!(Component::Selector, "📋 Collected {} test item(s)", items.len());
    Ok(items)
}
