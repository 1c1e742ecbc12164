//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Backend API call failed.
    #[error("API error: {0}")]
    Api(#[from] syntellite_api::Error),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// CSV parsing or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV file contained a header but no data rows.
    #[error("The file has no contact rows")]
    EmptyList,

    /// Candidate list not found.
    #[error("Contact list not found: {0}")]
    ListNotFound(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
