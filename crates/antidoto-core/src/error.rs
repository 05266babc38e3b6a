//! Core error types for antidoto-core.
//!
//! This module defines the error hierarchy using thiserror for
//! consistent error handling and reporting across the library.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for antidoto-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Authentication/session errors
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Remote row-store errors
    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteError),

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

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Authentication/session errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Email is not on the allow-list. The message is the user-facing
    /// rejection text and must stay human-readable.
    #[error("Acesso não autorizado. Adquira o Antídoto.")]
    NotAllowed,

    /// No session is present for an operation that requires one.
    #[error("Not signed in")]
    NotSignedIn,

    /// The email is syntactically unusable (empty after normalization).
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
}

/// Remote row-store errors.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Remote store is not configured or disabled
    #[error("Remote store not configured (set remote.base_url and remote.enabled)")]
    NotConfigured,

    /// Base URL could not be parsed
    #[error("Invalid remote base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// Transport-level failure
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Remote service returned a non-success status
    #[error("Remote API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Date outside the tracked year
    #[error("Date {date} is outside the tracked year {year}")]
    DateOutOfYear {
        date: chrono::NaiveDate,
        year: i32,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_allowed_message_is_user_facing() {
        let err = AuthError::NotAllowed;
        assert_eq!(err.to_string(), "Acesso não autorizado. Adquira o Antídoto.");
    }

    #[test]
    fn locked_database_maps_to_locked_variant() {
        let sqlite_err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        // SQLITE_BUSY is not DatabaseLocked; it maps to QueryFailed
        let err: DatabaseError = sqlite_err.into();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));
    }
}
