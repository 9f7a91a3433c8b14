//! Observability for the Comerce backend.
//!
//! This crate provides:
//! - `init_tracing` - installs the `tracing` subscriber from a [`LogConfig`]
//! - `RequestId` / `TraceContext` - per-request correlation
//! - `OperationTimer` - timing and outcome logging for batch operations

mod logging;
mod request;
mod span;

pub use logging::*;
pub use request::*;
pub use span::*;
