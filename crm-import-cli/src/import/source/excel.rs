//! Excel input via calamine
//!
//! Reads the first sheet: header names from the first row, one record per
//! data row.

use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto};
use serde_json::{Value, json};
use std::path::Path;

use super::{SourceRecord, build_record, validate_required_columns};

pub fn read_excel(path: &Path) -> Result<Vec<SourceRecord>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("Workbook has no sheets")?;
    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("Failed to read sheet: {sheet}"))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_name).collect(),
        None => anyhow::bail!("Sheet '{sheet}' is empty"),
    };
    validate_required_columns(&headers)?;

    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        let cells = row.iter().map(cell_to_value);
        if let Some(record) = build_record(index + 1, &headers, cells) {
            records.push(record);
        }
    }

    Ok(records)
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Convert an Excel cell to a JSON value
///
/// Whole floats become integers (Excel stores most numbers as floats);
/// empty and error cells become null.
fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => json!(*i),
        Data::Float(f) if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 => {
            json!(*f as i64)
        }
        Data::Float(f) => json!(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => Value::String(dt.to_string()),
        Data::DateTimeIso(s) => Value::String(s.clone()),
        Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(_) => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_value_coercions() {
        assert_eq!(cell_to_value(&Data::Empty), Value::Null);
        assert_eq!(cell_to_value(&Data::String("  ".into())), Value::Null);
        assert_eq!(
            cell_to_value(&Data::String("Acme".into())),
            json!("Acme")
        );
        assert_eq!(cell_to_value(&Data::Int(5)), json!(5));
        assert_eq!(cell_to_value(&Data::Float(5.0)), json!(5));
        assert_eq!(cell_to_value(&Data::Float(2.5)), json!(2.5));
        assert_eq!(cell_to_value(&Data::Bool(true)), json!(true));
    }

    #[test]
    fn test_header_name_trims_and_renders() {
        assert_eq!(header_name(&Data::String(" Name ".into())), "Name");
        assert_eq!(header_name(&Data::Empty), "");
        assert_eq!(header_name(&Data::Int(7)), "7");
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = read_excel(Path::new("does-not-exist.xlsx")).unwrap_err();
        assert!(err.to_string().contains("Failed to open spreadsheet"));
    }
}
