//! In-memory backend for development, tests and the CLI state file.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::backend::{Backend, ReadStamp, WriteOp};
use crate::document::RawDocument;
use crate::{StoreError, StoreResult};

type Collections = HashMap<String, BTreeMap<String, RawDocument>>;

/// Serializable dump of every collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub collections: BTreeMap<String, Vec<RawDocument>>,
}

/// HashMap-backed store. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a backend from a snapshot, keeping stored versions.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let collections = snapshot
            .collections
            .into_iter()
            .map(|(name, docs)| {
                let docs = docs.into_iter().map(|d| (d.id.clone(), d)).collect();
                (name, docs)
            })
            .collect();
        Self {
            collections: Arc::new(RwLock::new(collections)),
        }
    }

    /// Dump every collection.
    pub async fn snapshot(&self) -> Snapshot {
        let collections = self.collections.read().await;
        Snapshot {
            collections: collections
                .iter()
                .map(|(name, docs)| (name.clone(), docs.values().cloned().collect()))
                .collect(),
        }
    }

    fn current_version(collections: &Collections, collection: &str, id: &str) -> Option<u64> {
        collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|d| d.version)
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<RawDocument>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|docs| docs.get(id)).cloned())
    }

    async fn scan(&self, collection: &str) -> StoreResult<Vec<RawDocument>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn commit(&self, reads: &[ReadStamp], writes: Vec<WriteOp>) -> StoreResult<()> {
        let mut collections = self.collections.write().await;

        for stamp in reads {
            let actual = Self::current_version(&collections, &stamp.collection, &stamp.id);
            if actual != stamp.version {
                return Err(StoreError::Conflict {
                    collection: stamp.collection.clone(),
                    id: stamp.id.clone(),
                    expected: stamp.version,
                    actual,
                });
            }
        }

        for op in writes {
            match op {
                WriteOp::Put {
                    collection,
                    id,
                    body,
                } => {
                    let docs = collections.entry(collection).or_default();
                    let version = docs.get(&id).map(|d| d.version + 1).unwrap_or(1);
                    docs.insert(id.clone(), RawDocument { id, version, body });
                }
                WriteOp::Delete { collection, id } => {
                    if let Some(docs) = collections.get_mut(&collection) {
                        docs.remove(&id);
                    }
                }
            }
        }

        Ok(())
    }
}
