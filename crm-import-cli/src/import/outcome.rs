//! Terminal classification of one record's processing

use chrono::{DateTime, Local};
use serde_json::Value;

/// Exactly one outcome exists per record that was not skipped by
/// cancellation; `data` is the submitted payload, or the raw row for
/// records that never built a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { data: Value, status: u16 },
    Failure { data: Value, error: String },
}

impl Outcome {
    pub fn success(data: Value, status: u16) -> Self {
        Self::Success { data, status }
    }

    pub fn failure(data: Value, error: impl Into<String>) -> Self {
        Self::Failure {
            data,
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Render the log-file line for this outcome
    pub fn log_line(&self, timestamp: DateTime<Local>) -> String {
        let stamp = timestamp.format("%Y-%m-%d %H:%M:%S");
        match self {
            Self::Success { data, status } => {
                format!("[{stamp}] Success - Dados: {data} - Status: {status}")
            }
            Self::Failure { data, error } => {
                format!("[{stamp}] Failure - Dados: {data} - Erro: {error}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn stamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 30, 5).unwrap()
    }

    #[test]
    fn test_success_line_format() {
        let outcome = Outcome::success(json!({"name": "Acme"}), 201);
        assert_eq!(
            outcome.log_line(stamp()),
            r#"[2024-03-09 14:30:05] Success - Dados: {"name":"Acme"} - Status: 201"#
        );
    }

    #[test]
    fn test_failure_line_format() {
        let outcome = Outcome::failure(json!({"name": "Acme"}), "Status code: 500");
        assert_eq!(
            outcome.log_line(stamp()),
            r#"[2024-03-09 14:30:05] Failure - Dados: {"name":"Acme"} - Erro: Status code: 500"#
        );
    }
}
