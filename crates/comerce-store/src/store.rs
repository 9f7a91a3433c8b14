//! Store handle.

use std::sync::Arc;

use crate::backend::{Backend, WriteOp};
use crate::document::{Document, Versioned};
use crate::memory::InMemoryBackend;
use crate::session::Session;
use crate::{StoreError, StoreResult};

/// Shared handle to a document store.
///
/// Cheap to clone; every clone talks to the same backend.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn Backend>,
}

impl Store {
    /// Create a store over a backend.
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Create a store over an already shared backend.
    pub fn from_shared(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Create an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(InMemoryBackend::new())
    }

    /// Start a transaction.
    pub fn start_session(&self) -> Session {
        Session::new(self.backend.clone())
    }

    /// Find a document by id outside any transaction.
    pub async fn find_by_id<T: Document>(&self, id: &str) -> StoreResult<Option<T>> {
        self.backend
            .get(T::COLLECTION, id)
            .await?
            .map(|d| d.decode())
            .transpose()
    }

    /// Find a document by id together with its current version.
    pub async fn find_versioned<T: Document>(&self, id: &str) -> StoreResult<Option<Versioned<T>>> {
        match self.backend.get(T::COLLECTION, id).await? {
            Some(raw) => Ok(Some(Versioned {
                data: raw.decode()?,
                version: raw.version,
            })),
            None => Ok(None),
        }
    }

    /// Find a document by id, failing with `NotFound` if absent.
    pub async fn get<T: Document>(&self, id: &str) -> StoreResult<T> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found(T::COLLECTION, id))
    }

    /// Find every document of a collection matching a predicate.
    pub async fn find<T, P>(&self, predicate: P) -> StoreResult<Vec<T>>
    where
        T: Document,
        P: Fn(&T) -> bool,
    {
        let mut found = Vec::new();
        for raw in self.backend.scan(T::COLLECTION).await? {
            let doc: T = raw.decode()?;
            if predicate(&doc) {
                found.push(doc);
            }
        }
        Ok(found)
    }

    /// Insert or replace a single document.
    pub async fn save<T: Document>(&self, doc: &T) -> StoreResult<()> {
        self.backend.commit(&[], vec![WriteOp::put(doc)?]).await
    }

    /// Apply a batch of writes atomically, without read checks.
    pub async fn bulk_write(&self, ops: Vec<WriteOp>) -> StoreResult<()> {
        if ops.is_empty() {
            return Ok(());
        }
        self.backend.commit(&[], ops).await
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        text: String,
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn note(id: &str, text: &str) -> Note {
        Note {
            id: id.to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_bulk_write_and_find() {
        let store = Store::in_memory();
        store
            .bulk_write(vec![
                WriteOp::put(&note("n1", "pack")).unwrap(),
                WriteOp::put(&note("n2", "ship")).unwrap(),
                WriteOp::put(&note("n3", "pack")).unwrap(),
            ])
            .await
            .unwrap();

        let packs: Vec<Note> = store.find(|n: &Note| n.text == "pack").await.unwrap();
        assert_eq!(packs.len(), 2);

        store.bulk_write(vec![WriteOp::delete::<Note>("n1")]).await.unwrap();
        assert!(store.find_by_id::<Note>("n1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_versioned_read() {
        let store = Store::in_memory();
        store.save(&note("n1", "a")).await.unwrap();
        store.save(&note("n1", "b")).await.unwrap();

        let versioned = store.find_versioned::<Note>("n1").await.unwrap().unwrap();
        assert_eq!(versioned.version, 2);
        assert_eq!(versioned.data.text, "b");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = Store::in_memory();
        let err = store.get::<Note>("missing").await.unwrap_err();
        assert_eq!(err, StoreError::not_found("notes", "missing"));
    }
}
