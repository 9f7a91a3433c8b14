//! The fulfillment service handle.

use std::future::Future;

use comerce_domain::message::{Message, Report};
use comerce_domain::{CommerceError, CommerceResult, ErrorKind};
use comerce_observability::OperationTimer;
use comerce_store::{retry_on_conflict, RetryPolicy, Store};
use futures::future::join_all;

use crate::config::{ComerceConfig, FulfillmentSettings};

/// Runs fulfillment operations against a store.
///
/// Batch operations split their input into independent units (one order, or
/// one business group) that run concurrently, each in its own transaction.
/// A failed unit is rolled back and reported; its siblings still commit.
#[derive(Clone)]
pub struct FulfillmentService {
    store: Store,
    settings: FulfillmentSettings,
    retry: RetryPolicy,
}

impl FulfillmentService {
    pub fn new(store: Store, config: &ComerceConfig) -> Self {
        Self {
            store,
            settings: config.fulfillment.clone(),
            retry: config.retry_policy(),
        }
    }

    pub fn with_defaults(store: Store) -> Self {
        Self::new(store, &ComerceConfig::default())
    }

    pub fn with_settings(mut self, settings: FulfillmentSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn settings(&self) -> &FulfillmentSettings {
        &self.settings
    }

    /// Run one transactional unit, re-running it on write conflicts.
    pub(crate) async fn transact<T, F, Fut>(&self, op: F) -> CommerceResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = CommerceResult<T>>,
    {
        retry_on_conflict(&self.retry, op).await.map_err(abort_unexpected)
    }

    /// Run one unit of a batch. Failures become a single report message
    /// built by `describe`.
    pub(crate) async fn unit<F, Fut, D>(&self, describe: D, op: F) -> UnitOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = CommerceResult<Report>>,
        D: FnOnce(&CommerceError) -> String,
    {
        match self.transact(op).await {
            Ok(report) => UnitOutcome { ok: true, report },
            Err(e) => {
                match e.kind() {
                    ErrorKind::Server => tracing::error!(error = %e, "unit rolled back"),
                    _ => tracing::warn!(error = %e, "unit rejected"),
                }
                let message = match &e {
                    CommerceError::InsufficientInventory { .. } => Message::warning(describe(&e)),
                    _ => Message::error(describe(&e)),
                };
                UnitOutcome {
                    ok: false,
                    report: Report::from(vec![message]),
                }
            }
        }
    }
}

/// Result of one unit in a batch.
#[derive(Debug, Clone)]
pub(crate) struct UnitOutcome {
    pub ok: bool,
    pub report: Report,
}

/// Await every unit ("map + await all") and merge their reports in input order.
pub(crate) async fn run_batch<Fut>(operation: &'static str, units: Vec<Fut>) -> Report
where
    Fut: Future<Output = UnitOutcome>,
{
    let mut timer = OperationTimer::start(operation);
    let mut report = Report::new();
    for outcome in join_all(units).await {
        timer.unit(outcome.ok);
        report.extend(outcome.report);
    }
    timer.finish();
    report
}

/// Store failures and exhausted conflict retries surface as aborted units.
fn abort_unexpected(e: CommerceError) -> CommerceError {
    match e {
        CommerceError::Store(ref inner) if e.kind() == ErrorKind::Server => {
            CommerceError::TransactionAborted(inner.to_string())
        }
        other => other,
    }
}
