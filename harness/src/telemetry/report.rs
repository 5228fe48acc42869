//! Raw metrics report
//!
//! CSV file with one row per emulator interaction. Truncated once when the
//! session starts, then only appended to.

use csv::WriterBuilder;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::HarnessResult;
use shared::{Component, MetricRecord, component_debug, component_info};

#[derive(Debug, Clone)]
pub struct MetricReport {
    path: PathBuf,
}

impl MetricReport {
    /// Create (or truncate) the report and write the header row
    pub fn create<P: AsRef<Path>>(path: P) -> HarnessResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).write(true).truncate(true).open(&path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(MetricRecord::HEADER)?;
        writer.flush()?;

        component_info!(Component::Telemetry, "📝 Metrics report at {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row per record; returns the number of rows written
    pub fn append(&self, records: &[MetricRecord]) -> HarnessResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        for record in records {
            writer.write_record(record.to_row())?;
        }
        writer.flush()?;

        component_debug!(Component::Telemetry, "Appended {} metric row(s)", records.len());
        Ok(records.len())
    }
}
