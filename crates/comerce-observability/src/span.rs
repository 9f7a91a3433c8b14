//! Operation timing.

use std::time::{Duration, Instant};

/// Tracks one batch operation: how many units ran, how many failed, and how
/// long it took. Logs a summary when finished.
#[derive(Debug)]
pub struct OperationTimer {
    operation: &'static str,
    start: Instant,
    units: usize,
    failed: usize,
}

impl OperationTimer {
    pub fn start(operation: &'static str) -> Self {
        tracing::debug!(operation, "operation started");
        Self {
            operation,
            start: Instant::now(),
            units: 0,
            failed: 0,
        }
    }

    /// Record the outcome of one unit.
    pub fn unit(&mut self, ok: bool) {
        self.units += 1;
        if !ok {
            self.failed += 1;
        }
    }

    pub fn units(&self) -> usize {
        self.units
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Log the summary and return the elapsed time.
    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        if self.failed > 0 {
            tracing::warn!(
                operation = self.operation,
                units = self.units,
                failed = self.failed,
                elapsed_ms = elapsed.as_millis() as u64,
                "operation finished with failed units"
            );
        } else {
            tracing::info!(
                operation = self.operation,
                units = self.units,
                elapsed_ms = elapsed.as_millis() as u64,
                "operation finished"
            );
        }
        elapsed
    }
}
