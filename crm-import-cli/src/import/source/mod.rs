//! Record source: reads the input spreadsheet into ordered records
//!
//! Any read failure here is fatal to the run; per-cell problems are left to
//! the payload builder so they can be reported per record.

pub mod csv;
pub mod excel;

use anyhow::Result;
use serde_json::{Map, Value};
use std::path::Path;

use super::payload::{COL_COMPANY, COL_NAME, COL_TEAM_ID, COL_TESE, COL_USER_ID};

/// Columns that must appear in the header row
///
/// `tag_ids` and `stage_id` are allowed to be absent entirely; both have
/// per-record defaults.
pub const REQUIRED_COLUMNS: [&str; 5] =
    [COL_NAME, COL_COMPANY, COL_TESE, COL_USER_ID, COL_TEAM_ID];

/// One data row of the input file
///
/// `row` is the 1-based data-row number (the header row is not counted).
/// Cells are keyed by header name; absent and empty cells are not stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub row: usize,
    pub values: Map<String, Value>,
}

/// Read every record from the input file, dispatching on its extension
pub fn read_records(path: &Path) -> Result<Vec<SourceRecord>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => excel::read_excel(path),
        "csv" => csv::read_csv(path),
        other => anyhow::bail!(
            "Unsupported input format '.{other}' (expected .xlsx, .xls or .csv): {}",
            path.display()
        ),
    }
}

/// Fail fast when the header row lacks a required column
pub(crate) fn validate_required_columns(headers: &[String]) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|header| header == *required))
        .copied()
        .collect();

    if !missing.is_empty() {
        anyhow::bail!(
            "Input file is missing required column(s): {}",
            missing.join(", ")
        );
    }
    Ok(())
}

/// Build one record from parallel header/value slices
///
/// Cells under an empty header are dropped, as are null cells; a row with no
/// surviving cells yields `None`.
pub(crate) fn build_record(
    row: usize,
    headers: &[String],
    cells: impl Iterator<Item = Value>,
) -> Option<SourceRecord> {
    let mut values = Map::new();
    for (index, value) in cells.enumerate() {
        let header = headers.get(index).map(String::as_str).unwrap_or("");
        if header.is_empty() || value.is_null() {
            continue;
        }
        values.insert(header.to_string(), value);
    }

    if values.is_empty() {
        None
    } else {
        Some(SourceRecord { row, values })
    }
}
