//! Error types for checklist loading and summarising.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, ChecklistError>;

/// Every failure the pipeline can surface. All of them are deterministic
/// input-validation failures.
#[derive(Error, Debug)]
pub enum ChecklistError {
    /// The input file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    ResourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV header or a row does not have the expected shape.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A required column is absent.
    #[error("schema error: {0}")]
    SchemaError(String),

    /// Mutually exclusive parameters were supplied together.
    #[error("conflicting arguments: {0}")]
    ConflictingArguments(String),

    /// A value in a numeric column is not a valid non-negative integer.
    #[error("column '{column}' row {row}: cannot coerce {value:?} to an integer")]
    TypeCoercionError {
        column: String,
        row: usize,
        value: String,
    },

    /// The sum of a count column does not fit in an `i64`.
    #[error("column '{column}' row {row}: total overflows a 64-bit integer")]
    CountOverflow { column: String, row: usize },
}

impl ChecklistError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        ChecklistError::MalformedInput(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        ChecklistError::SchemaError(msg.into())
    }

    pub fn missing_column(name: &str) -> Self {
        ChecklistError::SchemaError(format!("column '{name}' not found"))
    }

    pub fn conflicting(msg: impl Into<String>) -> Self {
        ChecklistError::ConflictingArguments(msg.into())
    }
}
