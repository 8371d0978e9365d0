//! Batch driver
//!
//! Processes records strictly in source order, one at a time, logging
//! exactly one outcome per record. Cancellation is observed only between
//! records; a record mid-submission completes, retries included.

use colored::*;
use serde_json::Value;

use crate::api::{CrmClient, RetryConfig};

use super::cancel::CancelFlag;
use super::logs::RunLogs;
use super::outcome::Outcome;
use super::payload::build_payload;
use super::source::SourceRecord;

/// Statuses counted as a successful submission
const ACCEPTED_STATUSES: [u16; 2] = [200, 201];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records read from the source
    pub total: usize,
    /// Records that reached a terminal outcome
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Records left untouched after cancellation
    pub skipped: usize,
}

/// Run the import over every record
///
/// Per-record failures of any kind are logged and never abort the batch;
/// even a failed log write only loses that one line.
pub async fn run_import(
    records: Vec<SourceRecord>,
    client: &CrmClient,
    retry: &RetryConfig,
    logs: &RunLogs,
    cancel: &CancelFlag,
) -> RunSummary {
    let total = records.len();
    let mut summary = RunSummary {
        total,
        ..Default::default()
    };

    for record in records {
        if cancel.is_cancelled() {
            summary.skipped = total - summary.processed;
            println!("{}", "Stopping: cancellation requested".yellow());
            log::info!(
                "cancellation observed, {} record(s) left unprocessed",
                summary.skipped
            );
            break;
        }

        let row = record.row;
        println!("Processing row {row}/{total}");

        let outcome = process_record(record, client, retry).await;
        match &outcome {
            Outcome::Success { status, .. } => {
                summary.succeeded += 1;
                println!("{} row {row} (status {status})", "✓".green());
            }
            Outcome::Failure { error, .. } => {
                summary.failed += 1;
                println!("{} row {row}: {}", "✗".red(), error);
            }
        }

        if let Err(err) = logs.append(&outcome) {
            log::error!("failed to record outcome for row {row}: {err:#}");
        }
        summary.processed += 1;
    }

    summary
}

/// Take one record to its terminal outcome; never returns an error
async fn process_record(
    record: SourceRecord,
    client: &CrmClient,
    retry: &RetryConfig,
) -> Outcome {
    let payload = match build_payload(&record) {
        Ok(payload) => payload,
        // No submission attempt for a record that never built; the raw row
        // is logged in place of a payload.
        Err(err) => return Outcome::failure(Value::Object(record.values), err.to_string()),
    };

    let data = match serde_json::to_value(&payload) {
        Ok(data) => data,
        Err(err) => {
            return Outcome::failure(
                Value::Object(record.values),
                format!("Unexpected error: {err}"),
            );
        }
    };

    match client.submit(&payload, retry).await {
        Ok(response) => {
            let status = response.status().as_u16();
            if ACCEPTED_STATUSES.contains(&status) {
                Outcome::success(data, status)
            } else {
                Outcome::failure(data, format!("Status code: {status}"))
            }
        }
        Err(err) => Outcome::failure(data, err.to_string()),
    }
}
