//! Hierarchy engine error types.
//!
//! Row-level problems are [`Violation`]s: they are collected per row and
//! reported, never raised mid-batch. [`HierarchyError`] covers failures of
//! a whole operation.

use estate_core::error::EstateError;
use estate_core::models::Level;
use serde::Serialize;
use thiserror::Error;

/// Why a candidate record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViolationKind {
    /// The declared parent id does not exist at the parent level.
    MissingParent,
    /// The id is already taken at this level or earlier in the batch.
    DuplicateIdentifier,
    /// A value outside its declared enumeration.
    InvalidEnum,
    /// Lease terms present on an owned building, or missing on a leased one.
    ConditionalFieldMismatch,
    /// A required text field is empty.
    MissingRequiredField,
    /// A value that cannot be read for its field type (e.g. a bad date).
    MalformedValue,
    /// The store rejected the batch the row belonged to.
    StoreUnavailable,
}

/// A single rejected field or record, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{message}")]
pub struct Violation {
    pub kind: ViolationKind,
    /// The offending column, when one can be named.
    pub field: Option<String>,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.map(str::to_string),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("invalid {level} record: {violation}")]
    Invalid { level: Level, violation: Violation },

    #[error("{level} {id} not found")]
    NotFound { level: Level, id: String },

    #[error("{level} {id} still has {count} {child} record(s); remove them first")]
    HasChildren {
        level: Level,
        id: String,
        child: Level,
        count: usize,
    },

    #[error("{level} {id} cannot be moved to another parent")]
    ReparentUnsupported { level: Level, id: String },

    #[error("import of {rows} rows exceeds the limit of {limit}")]
    TooManyRows { rows: usize, limit: usize },

    #[error("tabular input has no header row")]
    MissingHeader,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("tabular output error: {0}")]
    Tabular(String),

    #[error("office context storage error: {0}")]
    ContextStorage(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Store(#[from] EstateError),
}

impl From<HierarchyError> for EstateError {
    fn from(err: HierarchyError) -> Self {
        match err {
            HierarchyError::Store(inner) => inner,
            HierarchyError::NotFound { level, id } => EstateError::NotFound {
                entity: level.table().into(),
                id,
            },
            HierarchyError::HasChildren {
                level, id, count, ..
            } => EstateError::HasChildren {
                entity: level.table().into(),
                id,
                count,
            },
            HierarchyError::Cancelled => EstateError::Cancelled,
            HierarchyError::ContextStorage(msg) | HierarchyError::Tabular(msg) => {
                EstateError::Internal(msg)
            }
            other => EstateError::Validation {
                message: other.to_string(),
            },
        }
    }
}
