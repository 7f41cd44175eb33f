//! Error types for the estate hierarchy system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EstateError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity} with id {id}")]
    AlreadyExists { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{entity} {id} still has {count} child record(s)")]
    HasChildren {
        entity: String,
        id: String,
        count: usize,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type EstateResult<T> = Result<T, EstateError>;
