//! Core error types for vitaquest-core.
//!
//! This module defines the error hierarchy using thiserror
//! for better error handling and reporting across the library.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for vitaquest-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Remote analysis service errors
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Persistent-backend errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Backend is unavailable or misconfigured
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::QueryFailed(err.to_string())
    }
}

/// Remote analysis/chat service errors.
///
/// Non-2xx responses carry the server's message text so the calling
/// surface can display it verbatim.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Server returned a non-success status
    #[error("Analysis service returned {status}: {message}")]
    Server { status: u16, message: String },

    /// Transport-level failure
    #[error("Analysis request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Unexpected analysis response: {0}")]
    InvalidResponse(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Level table must contain at least one entry
    #[error("Level table is empty")]
    EmptyLevelTable,

    /// Level table entries must be strictly increasing
    #[error("Level table is not strictly increasing at level {level}")]
    NonIncreasingThreshold { level: u32 },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
