//! CSV input
//!
//! CSV cells are untyped text; each one runs through the same scalar parse
//! the Excel path applies, so both formats feed the builder the same value
//! model.

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::Path;

use super::{SourceRecord, build_record, validate_required_columns};

pub fn read_csv(path: &Path) -> Result<Vec<SourceRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header row: {}", path.display()))?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();
    validate_required_columns(&headers)?;

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.with_context(|| {
            format!("Failed to read CSV row {}: {}", index + 1, path.display())
        })?;
        let cells = row.iter().map(parse_scalar);
        if let Some(record) = build_record(index + 1, &headers, cells) {
            records.push(record);
        }
    }

    Ok(records)
}

/// Parse one CSV cell into the value model shared with the Excel reader
fn parse_scalar(cell: &str) -> Value {
    let trimmed = cell.trim();

    if trimmed.is_empty() {
        return Value::Null;
    }

    match trimmed.to_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return json!(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return json!(f);
    }

    Value::String(trimmed.to_string())
}
