//! JSON state file backing the in-memory store.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use comerce_store::{InMemoryBackend, Snapshot, Store};

/// Default state file name.
pub const STATE_FILE: &str = "comerce-state.json";

/// A store loaded from a state file.
///
/// Commands mutate the store, then call [`State::save`] to write it back.
pub struct State {
    path: PathBuf,
    backend: InMemoryBackend,
}

impl State {
    /// Load a state file. A missing file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshot = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read state file: {}", path.display()))?;
            serde_json::from_str::<Snapshot>(&content)
                .with_context(|| format!("Failed to parse state file: {}", path.display()))?
        } else {
            Snapshot::default()
        };

        tracing::debug!(path = %path.display(), collections = snapshot.collections.len(), "state loaded");
        Ok(Self {
            path,
            backend: InMemoryBackend::from_snapshot(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A store handle over the loaded documents.
    pub fn store(&self) -> Store {
        Store::new(self.backend.clone())
    }

    /// Write every collection back to the state file.
    pub async fn save(&self) -> Result<()> {
        let snapshot = self.backend.snapshot().await;
        let content = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "state saved");
        Ok(())
    }
}
