//! Error types for pennybook-core
//!
//! Corrupt stores are repaired by `Ledger::initialize` and never show up here.
//! An empty query result is not an error either.

use pennybook_store::StoreError;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Date text did not match the configured format
    InvalidDate,
    /// Field value rejected at the record boundary
    ValidationError,
    /// Stored data could not be decoded
    InvalidFormat,
    /// IO error
    IoError,
    /// Configuration error
    ConfigError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::InvalidDate => write!(f, "INVALID_DATE"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Warning - the caller can retry with different input
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - the ledger cannot be used as configured
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Detailed error information for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for pennybook-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid date '{input}', expected format {format}")]
    InvalidDate { input: String, format: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::InvalidDate { .. } => ErrorCode::InvalidDate,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::Io(_) => ErrorCode::IoError,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::InvalidDate { .. } => ErrorSeverity::Warning,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Error,
            CoreError::Io(_) => ErrorSeverity::Error,
            CoreError::ConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::InvalidDate { input, format } => {
                details = details.with_detail(serde_json::json!({ "input": input, "format": format }));
                details = details.with_suggestion(format!(
                    "Enter dates in the form {}, for example {}.",
                    format,
                    sample_date(format)
                ));
            }
            CoreError::InvalidFormat { message } => {
                details = details.with_detail(serde_json::json!({ "format_message": message }));
                details = details.with_suggestion(
                    "Fix the reported line in the ledger file by hand.".to_string()
                );
            }
            CoreError::Io(e) => {
                details = details.with_detail(serde_json::json!({ "kind": format!("{:?}", e.kind()) }));
                details = details.with_suggestion(
                    "Ensure the ledger file exists and is readable and writable.".to_string()
                );
            }
            _ => {}
        }

        details
    }
}

fn sample_date(format: &str) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    match chrono::NaiveDate::from_ymd_opt(2024, 3, 15) {
        Some(date) if write!(out, "{}", date.format(format)).is_ok() => out,
        _ => format.to_string(),
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<StoreError> for CoreError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Io(e) => CoreError::Io(e),
            other => CoreError::InvalidFormat {
                message: other.to_string(),
            },
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::InvalidDate.to_string(), "INVALID_DATE");
        assert_eq!(ErrorCode::IoError.to_string(), "IO_ERROR");
    }

    #[test]
    fn test_core_error_severity() {
        let error = CoreError::InvalidDate {
            input: "32-01-2024".to_string(),
            format: "%d-%m-%Y".to_string(),
        };
        assert_eq!(error.severity(), ErrorSeverity::Warning);

        let error = CoreError::ConfigError { message: "test".to_string() };
        assert_eq!(error.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_invalid_date_details() {
        let error = CoreError::InvalidDate {
            input: "2024/01/01".to_string(),
            format: "%d-%m-%Y".to_string(),
        };
        let details = error.to_details();

        assert_eq!(details.code, ErrorCode::InvalidDate);
        assert!(details.details.is_some());
        assert!(details.suggestions[0].contains("15-03-2024"));
    }

    #[test]
    fn test_store_io_error_passes_through() {
        let store = StoreError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let error: CoreError = store.into();

        match error {
            CoreError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_store_column_error_is_format_error() {
        let error: CoreError = StoreError::ColumnCount { expected: 4, found: 2 }.into();
        assert_eq!(error.code(), ErrorCode::InvalidFormat);
    }
}
