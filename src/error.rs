//! Error types for the catalog data layer

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Restricted: {0}")]
    Restricted(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

// SQLSTATE class 23 is an integrity constraint violation. The schema declares
// the constraints; PostgreSQL detects the violations; this is where they turn
// into typed errors.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
const NOT_NULL_VIOLATION: &str = "23502";

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = e {
            let constraint = db.constraint().unwrap_or("").to_string();
            match db.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    return AppError::Conflict(format!("duplicate value ({constraint})"));
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    return AppError::Restricted(format!(
                        "foreign key violation ({constraint})"
                    ));
                }
                Some(CHECK_VIOLATION) => {
                    return AppError::Validation(format!("check failed ({constraint})"));
                }
                Some(NOT_NULL_VIOLATION) => {
                    return AppError::Validation("missing required field".to_string());
                }
                _ => {}
            }
        }
        AppError::Database(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
