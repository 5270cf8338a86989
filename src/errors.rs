//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Boundary errors (one variant per outcome the caller can act on)
    // ---------------------------
    #[error("Missing or invalid fields: {}", .campos.join(", "))]
    Validation { campos: Vec<String> },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

// Extended result codes, per sqlite3.h. rusqlite only surfaces the primary
// code as an enum; constraint subtypes come through `extended_code`.
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;
const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;

impl AppError {
    pub fn validation<S: Into<String>>(campos: Vec<S>) -> Self {
        AppError::Validation {
            campos: campos.into_iter().map(Into::into).collect(),
        }
    }

    /// Translate a raw store failure into a boundary error.
    ///
    /// Invariant: no raw rusqlite error reaches callers of the core engine.
    /// Referential-integrity violations become Validation, uniqueness
    /// violations become Conflict, everything else stays a generic Internal.
    pub fn de_store(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;

        match &err {
            rusqlite::Error::SqliteFailure(ffi_err, _)
                if ffi_err.code == ErrorCode::ConstraintViolation =>
            {
                match ffi_err.extended_code {
                    SQLITE_CONSTRAINT_FOREIGNKEY => {
                        AppError::validation(vec!["invalid reference data"])
                    }
                    SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY => {
                        AppError::Conflict("a similar request already exists".into())
                    }
                    _ => AppError::Internal(err.to_string()),
                }
            }
            _ => AppError::Internal(err.to_string()),
        }
    }
}
