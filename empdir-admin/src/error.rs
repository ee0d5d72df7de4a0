//! Admin tool error type

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by schema and population operations
#[derive(Debug, Error)]
pub enum AdminError {
    /// CSV file does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Table name does not match any table in the live schema
    #[error("Table '{0}' not found in the database.")]
    UnknownTable(String),

    /// Requested columns are not a subset of the table's columns
    #[error("Invalid field names for table '{table}'. Expected: {}", .expected.join(", "))]
    InvalidFields {
        table: String,
        expected: Vec<String>,
        /// Columns an insert must supply
        required: Vec<String>,
    },

    /// No field names given
    #[error("No field names given")]
    NoFields,

    /// CSV could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Shared-library failure (schema management, introspection)
    #[error(transparent)]
    Common(#[from] empdir_common::Error),

    /// Console I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for admin operations
pub type AdminResult<T> = Result<T, AdminError>;
