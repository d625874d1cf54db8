//! Error types for persistence and export

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while loading or saving grid state
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Storage key that cannot be used as a file name
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Persisted state that parses as JSON but not as a grid
    #[error("Invalid persisted state: {0}")]
    InvalidState(String),
}

/// Errors that can occur while exporting a grid
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV export error
    #[error("CSV export failed: {0}")]
    Csv(#[from] slate_sheets_csv::CsvError),

    /// JSON export error
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
