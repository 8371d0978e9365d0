//! Append-only run logs
//!
//! Two files per run, named from the run-start timestamp. Every append
//! opens, writes one line, flushes and closes, so lines already written
//! survive a crash mid-run.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::outcome::Outcome;

#[derive(Debug, Clone)]
pub struct RunLogs {
    success_path: PathBuf,
    failure_path: PathBuf,
}

impl RunLogs {
    /// Create both log files in `dir`, named from the current time
    pub fn create(dir: &Path) -> Result<Self> {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let logs = Self {
            success_path: dir.join(format!("successful_requests_{stamp}.txt")),
            failure_path: dir.join(format!("failed_requests_{stamp}.txt")),
        };

        // Touch both so their names are observable from the first progress
        // line, not only after the first outcome.
        for path in [&logs.success_path, &logs.failure_path] {
            open_append(path)?;
        }
        Ok(logs)
    }

    pub fn success_path(&self) -> &Path {
        &self.success_path
    }

    pub fn failure_path(&self) -> &Path {
        &self.failure_path
    }

    /// Append one line to the file matching the outcome
    pub fn append(&self, outcome: &Outcome) -> Result<()> {
        let path = if outcome.is_success() {
            &self.success_path
        } else {
            &self.failure_path
        };

        let mut file = open_append(path)?;
        writeln!(file, "{}", outcome.log_line(Local::now()))
            .with_context(|| format!("Failed to write log line: {}", path.display()))?;
        file.flush()
            .with_context(|| format!("Failed to flush log file: {}", path.display()))?;
        Ok(())
    }
}

fn open_append(path: &Path) -> Result<std::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}
