//! Repository Module
//!
//! Flat SQL functions over `&SqlitePool`, one module per table group.
//! Business rules live in the domain modules (`otp`, `orders`, `stock`,
//! `notify`); these functions stay mechanical.

pub mod family;
pub mod item;
pub mod member;
pub mod notification;
pub mod order;
pub mod otp;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// SQLite write-lock wait exceeded busy_timeout; nothing committed
    #[error("Database busy")]
    Busy,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return RepoError::Duplicate(db_err.message().to_string());
            }
            // SQLITE_BUSY (5) / SQLITE_LOCKED (6) after busy_timeout
            let code = db_err.code();
            let code = code.as_deref().unwrap_or("");
            if code == "5" || code == "6" || db_err.message().contains("locked") {
                return RepoError::Busy;
            }
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
