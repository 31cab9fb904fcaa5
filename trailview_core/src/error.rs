//! Error types for the replay engine.

use serde::Serialize;
use thiserror::Error;
use trailview_env::EnvError;

/// Coordinate conversion failures.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum GeoError {
    #[error("Non-finite coordinate: lat={latitude}, lon={longitude}")]
    NonFinite { latitude: f64, longitude: f64 },
}

/// Failures that abort a table load or a configuration load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Obstacle rows need the origin established by the path log
    #[error("No reference origin: the path log has no valid rows")]
    MissingOrigin,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// A row that was dropped during a table load.
///
/// Row issues never abort a load; they are collected in the table's
/// `LoadReport`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowIssue {
    /// Index of the row in the input, header included (header = 0)
    pub row: usize,
    pub kind: RowIssueKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RowIssueKind {
    /// Too few fields
    MalformedRow { found: usize, required: usize },

    /// A required field is not a finite number
    UnparsableField { column: usize, value: String },

    /// Coordinates parsed but could not be converted
    Conversion(GeoError),
}

impl std::fmt::Display for RowIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            RowIssueKind::MalformedRow { found, required } => write!(
                f,
                "row {}: expected at least {} fields, found {}",
                self.row, required, found
            ),
            RowIssueKind::UnparsableField { column, value } => write!(
                f,
                "row {}: column {} is not a number: {:?}",
                self.row, column, value
            ),
            RowIssueKind::Conversion(err) => write!(f, "row {}: {}", self.row, err),
        }
    }
}

/// Errors surfaced while driving a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Host(#[from] EnvError),

    /// Frame deltas must be finite and non-negative
    #[error("Invalid frame delta: {0}")]
    InvalidDelta(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_issue_display() {
        let issue = RowIssue {
            row: 4,
            kind: RowIssueKind::MalformedRow { found: 2, required: 3 },
        };
        assert_eq!(issue.to_string(), "row 4: expected at least 3 fields, found 2");

        let issue = RowIssue {
            row: 2,
            kind: RowIssueKind::UnparsableField { column: 1, value: "abc".to_string() },
        };
        assert_eq!(issue.to_string(), "row 2: column 1 is not a number: \"abc\"");
    }

    #[test]
    fn test_host_error_converts() {
        let err: ReplayError = EnvError::host("gone").into();
        assert!(matches!(err, ReplayError::Host(_)));
    }
}
