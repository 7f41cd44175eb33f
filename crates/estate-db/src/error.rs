//! Database-specific error types and conversions.

use estate_core::error::EstateError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Stored record could not be decoded: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for EstateError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => EstateError::NotFound { entity, id },
            DbError::Surreal(e) => EstateError::StoreUnavailable(e.to_string()),
            DbError::Decode(msg) => EstateError::Internal(msg),
            other => EstateError::Database(other.to_string()),
        }
    }
}
