//! Storage backend trait.

use async_trait::async_trait;

use crate::document::{encode, Document, RawDocument};
use crate::StoreResult;

/// A write staged for commit.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Insert or replace a document body.
    Put {
        collection: String,
        id: String,
        body: serde_json::Value,
    },
    /// Remove a document.
    Delete { collection: String, id: String },
}

impl WriteOp {
    /// Validate and encode a typed document as a put.
    pub fn put<T: Document>(doc: &T) -> StoreResult<Self> {
        Ok(WriteOp::Put {
            collection: T::COLLECTION.to_string(),
            id: doc.id().to_string(),
            body: encode(doc)?,
        })
    }

    /// Delete a typed document by id.
    pub fn delete<T: Document>(id: impl Into<String>) -> Self {
        WriteOp::Delete {
            collection: T::COLLECTION.to_string(),
            id: id.into(),
        }
    }

    pub fn key(&self) -> (&str, &str) {
        match self {
            WriteOp::Put { collection, id, .. } | WriteOp::Delete { collection, id } => {
                (collection, id)
            }
        }
    }
}

/// The version of a document observed by a transaction.
///
/// `version: None` records that the document was absent when read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadStamp {
    pub collection: String,
    pub id: String,
    pub version: Option<u64>,
}

/// Persistence backend behind a [`Store`](crate::Store).
///
/// `commit` must be atomic: either every read stamp still matches and every
/// write is applied, or nothing changes and `StoreError::Conflict` is returned.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch one document.
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<RawDocument>>;

    /// Fetch every document of a collection, ordered by id.
    async fn scan(&self, collection: &str) -> StoreResult<Vec<RawDocument>>;

    /// Validate read stamps and apply writes as one unit.
    async fn commit(&self, reads: &[ReadStamp], writes: Vec<WriteOp>) -> StoreResult<()>;
}
