//! Error types for Mailroom.

use thiserror::Error;

/// Common error type for Mailroom.
#[derive(Error, Debug)]
pub enum MailroomError {
    /// Database error.
    ///
    /// Wraps any failure reported by the storage engine. Database errors
    /// from sqlx are converted automatically, except unique-key violations
    /// which callers map to [`MailroomError::Conflict`].
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error (bad credentials, invalid token).
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unique key already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for MailroomError {
    fn from(e: sqlx::Error) -> Self {
        MailroomError::Database(e.to_string())
    }
}

/// Check whether a sqlx error is a unique constraint violation.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Result type alias for Mailroom operations.
pub type Result<T> = std::result::Result<T, MailroomError>;
