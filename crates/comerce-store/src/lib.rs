//! Transactional document store for the Comerce fulfillment backend.
//!
//! Documents are serde types grouped in named collections. Every stored
//! document carries a version; a [`Session`] records the versions it reads and
//! its commit fails with [`StoreError::Conflict`] when any of them moved, so
//! concurrent transactions touching the same inventory lot cannot both win.
//!
//! # Example
//!
//! ```rust,ignore
//! use comerce_store::{Store, retry_on_conflict, RetryPolicy};
//!
//! let store = Store::in_memory();
//! retry_on_conflict(&RetryPolicy::default(), || async {
//!     let mut session = store.start_session();
//!     let mut lot: InventoryLot = session.get("lot-1").await?;
//!     lot.on_hand -= 1;
//!     session.save(&lot)?;
//!     session.commit().await
//! })
//! .await?;
//! ```

mod backend;
mod document;
mod error;
mod memory;
mod retry;
mod session;
mod store;

pub use backend::{Backend, ReadStamp, WriteOp};
pub use document::{Document, RawDocument, Versioned};
pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryBackend, Snapshot};
pub use retry::{retry_on_conflict, BackoffStrategy, RetryPolicy, RetrySettings, Retryable};
pub use session::Session;
pub use store::Store;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Document, Session, Store, StoreError, StoreResult, WriteOp};
}
