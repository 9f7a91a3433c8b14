//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when using the document store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No document with this id in the collection.
    #[error("{collection} document not found: {id}")]
    NotFound { collection: String, id: String },

    /// A document changed between being read and the commit that depends on it.
    #[error("write conflict on {collection}/{id}: read version {expected:?}, found {actual:?}")]
    Conflict {
        collection: String,
        id: String,
        expected: Option<u64>,
        actual: Option<u64>,
    },

    /// The document failed its schema validation.
    #[error("invalid {collection} document {id}: {reason}")]
    Validation {
        collection: String,
        id: String,
        reason: String,
    },

    /// Failed to serialize or deserialize a document body.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Backend storage failure.
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.into(),
        }
    }

    /// Whether re-running the whole transaction may succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
