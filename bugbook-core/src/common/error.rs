use thiserror::Error;
use uuid::Uuid;

use crate::domain::FieldErrors;

#[derive(Error, Debug)]
pub enum BugbookError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("validation failed")]
    Validation(FieldErrors),
}

pub type Result<T> = std::result::Result<T, BugbookError>;
