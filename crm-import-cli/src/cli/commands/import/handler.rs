//! Import command handler: wires the source, client, logs and runner together

use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::time::Duration;

use super::ImportArgs;
use crate::api::CrmClient;
use crate::config::ImportConfig;
use crate::import::cancel::{self, CancelFlag};
use crate::import::logs::RunLogs;
use crate::import::payload::build_payload;
use crate::import::runner::run_import;
use crate::import::source::{self, SourceRecord};

/// Handle the import command
pub async fn handle_import_command(args: ImportArgs) -> Result<()> {
    // Handle --no-color flag
    if args.no_color {
        colored::control::set_override(false);
    }

    if !args.file.exists() {
        anyhow::bail!("Input file does not exist: {}", args.file.display());
    }

    let mut config = ImportConfig::load(args.config.as_deref())?;
    if let Some(url) = args.url {
        config.api_url = url;
    }
    if let Some(secs) = args.timeout {
        config.retry.request_timeout = Duration::from_secs(secs);
    }
    if let Some(attempts) = args.max_attempts {
        if attempts == 0 {
            anyhow::bail!("--max-attempts must be at least 1");
        }
        config.retry.max_attempts = attempts;
    }
    if let Some(dir) = args.log_dir {
        config.log_dir = dir;
    }

    // A file that cannot be read or is missing required columns aborts the
    // run here, before anything is submitted or logged.
    let records = source::read_records(&args.file)
        .with_context(|| format!("Failed to read input file: {}", args.file.display()))?;

    println!(
        "Loaded {} record(s) from {}",
        records.len().to_string().bright_green(),
        args.file.display().to_string().cyan()
    );

    if args.dry {
        return dry_run(&records);
    }

    let cancel = CancelFlag::new();
    cancel::spawn_signal_watcher(cancel.clone());

    fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log directory: {}", config.log_dir.display()))?;
    let logs = RunLogs::create(&config.log_dir)?;
    println!(
        "Logging to {} and {}",
        logs.success_path().display().to_string().cyan(),
        logs.failure_path().display().to_string().cyan()
    );

    let client = CrmClient::new(&config.api_url)?;
    log::info!(
        "submitting {} record(s) to {}",
        records.len(),
        client.endpoint()
    );

    let summary = run_import(records, &client, &config.retry, &logs, &cancel).await;

    println!();
    println!(
        "Import finished: {} succeeded, {} failed, {} skipped ({}/{} rows processed)",
        summary.succeeded.to_string().green(),
        summary.failed.to_string().red(),
        summary.skipped.to_string().yellow(),
        summary.processed,
        summary.total
    );

    Ok(())
}

/// Build every payload and report it without touching the network or the logs
fn dry_run(records: &[SourceRecord]) -> Result<()> {
    let mut invalid = 0usize;
    for record in records {
        match build_payload(record) {
            Ok(payload) => {
                let body = serde_json::to_string(&payload)
                    .context("Failed to render payload as JSON")?;
                println!("row {}: {}", record.row, body);
            }
            Err(err) => {
                invalid += 1;
                println!("row {}: {} {}", record.row, "invalid:".red(), err);
            }
        }
    }
    println!();
    println!(
        "Dry run: {} record(s), {} invalid",
        records.len(),
        invalid.to_string().red()
    );
    Ok(())
}
