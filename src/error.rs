//! Application error kinds
//!
//! Services return [`AppError`]; the API layer maps each kind to a status
//! code and body in one place (`impl From<AppError> for ApiError`).

use thiserror::Error;

use crate::models::ContactValidationError;

/// Message reported whenever no datastore handle is available
pub const DATABASE_NOT_CONFIGURED: &str = "Database not configured";

#[derive(Debug, Error)]
pub enum AppError {
    /// The payload does not satisfy the schema; the datastore was not touched
    #[error("{0}")]
    Validation(String),

    /// No datastore handle was configured at startup
    #[error("Database not configured")]
    DatabaseNotConfigured,

    /// The datastore rejected or failed the operation
    #[error("{0:#}")]
    Datastore(anyhow::Error),
}

impl From<ContactValidationError> for AppError {
    fn from(err: ContactValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
