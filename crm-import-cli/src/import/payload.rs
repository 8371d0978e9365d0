//! Payload construction from one source record
//!
//! Cells arrive as loosely-typed `serde_json::Value`s; `build_payload`
//! validates the whole row and reports every bad field at once instead of
//! failing on the first.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::source::SourceRecord;

pub const COL_NAME: &str = "Name";
pub const COL_COMPANY: &str = "Company Name";
pub const COL_TESE: &str = "x_studio_tese";
pub const COL_USER_ID: &str = "user_id";
pub const COL_TEAM_ID: &str = "team_id";
pub const COL_TAG_IDS: &str = "tag_ids";
pub const COL_STAGE_ID: &str = "stage_id";

/// Stage assigned when the source row has no `stage_id`
pub const DEFAULT_STAGE_ID: i64 = 10;

/// The JSON body POSTed to the opportunities endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityPayload {
    pub name: String,
    pub contact_name: String,
    #[serde(rename = "x_studio_tese")]
    pub tese: String,
    pub user_id: i64,
    pub team_id: i64,
    pub tag_ids: Vec<String>,
    pub stage_id: i64,
}

/// Why a single column could not be coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProblemKind {
    #[error("missing value")]
    Missing,
    #[error("expected text")]
    ExpectedText,
    #[error("expected an integer")]
    ExpectedInteger,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{column}: {kind}")]
pub struct FieldProblem {
    pub column: &'static str,
    pub kind: ProblemKind,
}

/// Construction failure carrying every invalid field of the row
#[derive(Debug, Clone, Error)]
#[error("invalid record: {}", .problems.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct BuildError {
    pub problems: Vec<FieldProblem>,
}

/// Validate and coerce one source record into a payload
pub fn build_payload(record: &SourceRecord) -> Result<OpportunityPayload, BuildError> {
    let values = &record.values;
    let mut problems = Vec::new();

    let name = collect(&mut problems, string_field(values, COL_NAME));
    let contact_name = collect(&mut problems, string_field(values, COL_COMPANY));
    let tese = collect(&mut problems, string_field(values, COL_TESE));
    let user_id = collect(&mut problems, int_field(values, COL_USER_ID));
    let team_id = collect(&mut problems, int_field(values, COL_TEAM_ID));
    let stage_id = collect(
        &mut problems,
        optional_int_field(values, COL_STAGE_ID, DEFAULT_STAGE_ID),
    );
    let tag_ids = tag_ids_field(values);

    match (name, contact_name, tese, user_id, team_id, stage_id) {
        (Some(name), Some(contact_name), Some(tese), Some(user_id), Some(team_id), Some(stage_id))
            if problems.is_empty() =>
        {
            Ok(OpportunityPayload {
                name,
                contact_name,
                tese,
                user_id,
                team_id,
                tag_ids,
                stage_id,
            })
        }
        _ => Err(BuildError { problems }),
    }
}

fn collect<T>(problems: &mut Vec<FieldProblem>, result: Result<T, FieldProblem>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(problem) => {
            problems.push(problem);
            None
        }
    }
}

/// String coercion: text is taken verbatim, numbers and booleans are
/// rendered to their display form (operator-maintained sheets mix types).
fn string_field(values: &Map<String, Value>, column: &'static str) -> Result<String, FieldProblem> {
    match values.get(column) {
        None | Some(Value::Null) => Err(FieldProblem {
            column,
            kind: ProblemKind::Missing,
        }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(FieldProblem {
            column,
            kind: ProblemKind::ExpectedText,
        }),
    }
}

/// Integer coercion: integer cells directly, text cells when they parse
fn int_field(values: &Map<String, Value>, column: &'static str) -> Result<i64, FieldProblem> {
    match values.get(column) {
        None | Some(Value::Null) => Err(FieldProblem {
            column,
            kind: ProblemKind::Missing,
        }),
        Some(value) => coerce_int(value).ok_or(FieldProblem {
            column,
            kind: ProblemKind::ExpectedInteger,
        }),
    }
}

/// Like `int_field` but an absent cell takes the default; a present cell
/// that is not an integer is still a problem.
fn optional_int_field(
    values: &Map<String, Value>,
    column: &'static str,
    default: i64,
) -> Result<i64, FieldProblem> {
    match values.get(column) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => coerce_int(value).ok_or(FieldProblem {
            column,
            kind: ProblemKind::ExpectedInteger,
        }),
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A non-empty text cell is split on `,` verbatim; every other shape
/// (absent, null, numeric) yields no tags.
fn tag_ids_field(values: &Map<String, Value>) -> Vec<String> {
    match values.get(COL_TAG_IDS) {
        Some(Value::String(s)) if !s.is_empty() => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}
