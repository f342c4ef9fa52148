//! Error types for loading sales data and reading configuration.
//!
//! Filtering, metrics and aggregation are total functions and have no
//! error type of their own.

use std::path::PathBuf;
use thiserror::Error;

/// The two failure kinds surfaced to the user when a load fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    FileNotFound,
    LoadFailure,
}

/// Failure to produce a `SalesTable` from a source path.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Data file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to load or process data: {0}")]
    Parse(#[from] ParseError),
}

impl LoadError {
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            LoadError::FileNotFound { .. } => LoadErrorKind::FileNotFound,
            LoadError::Parse(_) => LoadErrorKind::LoadFailure,
        }
    }
}

/// Anything that goes wrong between opening the file and the last row.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{0}' is missing from the header")]
    MissingColumn(String),

    #[error("Line {line}: cannot parse '{value}' as a date")]
    InvalidDate { line: u64, value: String },

    #[error("Line {line}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },

    #[error("Line {line}: sales amount {value} is negative")]
    NegativeSales { line: u64, value: f64 },
}

/// Invalid server configuration read from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got '{0}'")]
    InvalidPort(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}
