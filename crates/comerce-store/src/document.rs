//! Document trait and raw stored representation.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{StoreError, StoreResult};

/// A type that can be persisted in a collection of the document store.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name, e.g. `"orders"`.
    const COLLECTION: &'static str;

    /// Stable identifier within the collection.
    fn id(&self) -> &str;

    /// Schema check run before every write.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// A document body as stored by a backend, with its version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: String,
    pub version: u64,
    pub body: serde_json::Value,
}

impl RawDocument {
    /// Deserialize the body into a typed document.
    pub fn decode<T: Document>(&self) -> StoreResult<T> {
        serde_json::from_value(self.body.clone()).map_err(StoreError::from)
    }
}

/// A typed document together with the version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// Run schema validation and encode a document for writing.
pub(crate) fn encode<T: Document>(doc: &T) -> StoreResult<serde_json::Value> {
    doc.validate().map_err(|reason| StoreError::Validation {
        collection: T::COLLECTION.to_string(),
        id: doc.id().to_string(),
        reason,
    })?;
    Ok(serde_json::to_value(doc)?)
}
