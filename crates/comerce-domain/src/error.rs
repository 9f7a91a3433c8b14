//! Commerce error types.

use comerce_store::{Retryable, StoreError};
use thiserror::Error;

/// Result type for commerce operations.
pub type CommerceResult<T> = Result<T, CommerceError>;

/// Errors that can occur in fulfillment operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Required input missing or empty.
    #[error("Incomplete data: {0}")]
    IncompleteData(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Inventory lot not found.
    #[error("Inventory lot not found: {0}")]
    LotNotFound(String),

    /// Business not found.
    #[error("Business not found: {0}")]
    BusinessNotFound(String),

    /// Deliverer not found.
    #[error("Deliverer not found: {0}")]
    DelivererNotFound(String),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Logistics record not found.
    #[error("Logistics record not found: {0}")]
    LogisticsNotFound(String),

    /// Allocation could not cover the requested quantity.
    #[error("Insufficient inventory for {product_id}: requested {requested}, short by {shortfall}")]
    InsufficientInventory {
        product_id: String,
        requested: u32,
        shortfall: u32,
    },

    /// Status change not allowed by the fulfillment hierarchy.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    /// Operation not valid for the current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Caller is not allowed to perform the operation.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A per-unit transaction was rolled back.
    #[error("Transaction aborted: {0}")]
    TransactionAborted(String),

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Document store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Unexpected failure.
    #[error("Server error: {0}")]
    Server(String),
}

/// Coarse classification used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid or incomplete input (406).
    Invalid,
    /// Something referenced does not exist (404).
    NotFound,
    /// Caller lacks the required role (401).
    Unauthorized,
    /// Anything unexpected (500).
    Server,
}

impl CommerceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommerceError::IncompleteData(_)
            | CommerceError::InsufficientInventory { .. }
            | CommerceError::InvalidStateTransition { .. }
            | CommerceError::InvalidState(_)
            | CommerceError::Validation(_) => ErrorKind::Invalid,
            CommerceError::OrderNotFound(_)
            | CommerceError::ProductNotFound(_)
            | CommerceError::LotNotFound(_)
            | CommerceError::BusinessNotFound(_)
            | CommerceError::DelivererNotFound(_)
            | CommerceError::CustomerNotFound(_)
            | CommerceError::LogisticsNotFound(_) => ErrorKind::NotFound,
            CommerceError::Unauthorized(_) => ErrorKind::Unauthorized,
            CommerceError::Store(StoreError::NotFound { .. }) => ErrorKind::NotFound,
            CommerceError::Store(StoreError::Validation { .. }) => ErrorKind::Invalid,
            CommerceError::Store(_)
            | CommerceError::TransactionAborted(_)
            | CommerceError::Server(_) => ErrorKind::Server,
        }
    }

    pub fn incomplete(what: impl Into<String>) -> Self {
        CommerceError::IncompleteData(what.into())
    }

    pub fn transition(from: impl ToString, to: impl ToString) -> Self {
        CommerceError::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl Retryable for CommerceError {
    fn is_retryable(&self) -> bool {
        matches!(self, CommerceError::Store(e) if e.is_conflict())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Store(StoreError::from(e))
    }
}
