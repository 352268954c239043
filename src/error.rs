//! Error types used throughout the reporter.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while generating, loading or storing reports.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Start date {start} must be before or equal to end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid date '{0}'. Use YYYY-MM-DD.")]
    InvalidDateKey(String),

    #[error("Report not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for reporter operations.
pub type Result<T> = std::result::Result<T, ReportError>;
