//! Transactions over the document store.

use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::{Backend, ReadStamp, WriteOp};
use crate::document::{encode, Document};
use crate::{StoreError, StoreResult};

type Key = (String, String);

fn key<T: Document>(id: &str) -> Key {
    (T::COLLECTION.to_string(), id.to_string())
}

#[derive(Debug, Clone)]
enum Staged {
    Put(serde_json::Value),
    Delete,
}

/// A transaction against the store.
///
/// Reads record the version they observed and writes are staged locally
/// (later reads in the same session see them). [`Session::commit`] applies
/// everything atomically, or fails with [`StoreError::Conflict`] if any
/// document read by the session changed in the meantime. A session dropped
/// without committing is aborted.
pub struct Session {
    backend: Arc<dyn Backend>,
    reads: HashMap<Key, Option<u64>>,
    staged: HashMap<Key, Staged>,
    write_order: Vec<Key>,
}

impl Session {
    pub(crate) fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            reads: HashMap::new(),
            staged: HashMap::new(),
            write_order: Vec::new(),
        }
    }

    /// Find a document by id.
    pub async fn find_by_id<T: Document>(&mut self, id: &str) -> StoreResult<Option<T>> {
        let key = key::<T>(id);
        if let Some(staged) = self.staged.get(&key) {
            return match staged {
                Staged::Put(body) => Ok(Some(serde_json::from_value(body.clone())?)),
                Staged::Delete => Ok(None),
            };
        }

        let raw = self.backend.get(T::COLLECTION, id).await?;
        self.reads
            .entry(key)
            .or_insert_with(|| raw.as_ref().map(|d| d.version));
        raw.map(|d| d.decode()).transpose()
    }

    /// Find a document by id, failing with `NotFound` if absent.
    pub async fn get<T: Document>(&mut self, id: &str) -> StoreResult<T> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found(T::COLLECTION, id))
    }

    /// Find every document of a collection matching a predicate.
    pub async fn find<T, P>(&mut self, predicate: P) -> StoreResult<Vec<T>>
    where
        T: Document,
        P: Fn(&T) -> bool,
    {
        let mut found = Vec::new();
        let mut seen = Vec::new();

        for raw in self.backend.scan(T::COLLECTION).await? {
            let key = key::<T>(&raw.id);
            let doc: T = match self.staged.get(&key) {
                Some(Staged::Put(body)) => serde_json::from_value(body.clone())?,
                Some(Staged::Delete) => continue,
                None => raw.decode()?,
            };
            seen.push(key.clone());
            if predicate(&doc) {
                self.reads.entry(key).or_insert(Some(raw.version));
                found.push(doc);
            }
        }

        // Documents created inside this session.
        for key in &self.write_order {
            if key.0 != T::COLLECTION || seen.contains(key) {
                continue;
            }
            if let Some(Staged::Put(body)) = self.staged.get(key) {
                let doc: T = serde_json::from_value(body.clone())?;
                if predicate(&doc) {
                    found.push(doc);
                }
            }
        }

        Ok(found)
    }

    /// Stage an insert-or-replace.
    pub fn save<T: Document>(&mut self, doc: &T) -> StoreResult<()> {
        let body = encode(doc)?;
        self.stage(key::<T>(doc.id()), Staged::Put(body));
        Ok(())
    }

    /// Stage a new document; the commit fails if the id already exists.
    pub fn insert<T: Document>(&mut self, doc: &T) -> StoreResult<()> {
        let key = key::<T>(doc.id());
        self.reads.entry(key).or_insert(None);
        self.save(doc)
    }

    /// Stage a delete.
    pub fn delete<T: Document>(&mut self, id: &str) {
        self.stage(key::<T>(id), Staged::Delete);
    }

    /// Number of staged writes.
    pub fn pending_writes(&self) -> usize {
        self.write_order.len()
    }

    /// Apply every staged write atomically.
    pub async fn commit(self) -> StoreResult<()> {
        let reads: Vec<ReadStamp> = self
            .reads
            .into_iter()
            .map(|((collection, id), version)| ReadStamp {
                collection,
                id,
                version,
            })
            .collect();

        let mut staged = self.staged;
        let writes: Vec<WriteOp> = self
            .write_order
            .into_iter()
            .filter_map(|key| {
                let op = staged.remove(&key)?;
                let (collection, id) = key;
                Some(match op {
                    Staged::Put(body) => WriteOp::Put {
                        collection,
                        id,
                        body,
                    },
                    Staged::Delete => WriteOp::Delete { collection, id },
                })
            })
            .collect();

        tracing::debug!(reads = reads.len(), writes = writes.len(), "committing session");
        self.backend.commit(&reads, writes).await
    }

    /// Discard every staged write.
    pub fn abort(self) {
        tracing::debug!(writes = self.write_order.len(), "aborting session");
    }

    fn stage(&mut self, key: Key, op: Staged) {
        if !self.staged.contains_key(&key) {
            self.write_order.push(key.clone());
        }
        self.staged.insert(key, op);
    }
}
