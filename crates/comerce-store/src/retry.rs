//! Retry policies for transactions that lose a write conflict.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Backoff strategy between retry attempts.
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// No delay between retries.
    None,
    /// Fixed delay between retries.
    Fixed(Duration),
    /// Exponential backoff with base and max.
    Exponential {
        /// Initial delay.
        base: Duration,
        /// Maximum delay.
        max: Duration,
    },
}

impl BackoffStrategy {
    /// Calculate delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed(d) => *d,
            Self::Exponential { base, max } => {
                let multiplier = 2u64.saturating_pow(attempt);
                let delay = Duration::from_millis((base.as_millis() as u64).saturating_mul(multiplier));
                std::cmp::min(delay, *max)
            }
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(20),
            max: Duration::from_millis(200),
        }
    }
}

/// Errors that can tell whether re-running the transaction may help.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for StoreError {
    fn is_retryable(&self) -> bool {
        self.is_conflict()
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_attempts: u32,
    /// Backoff strategy.
    pub backoff: BackoffStrategy,
}

impl RetryPolicy {
    /// Create a new retry policy.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: BackoffStrategy::default(),
        }
    }

    /// Create a policy with no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 0,
            backoff: BackoffStrategy::None,
        }
    }

    /// Set backoff strategy.
    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff = strategy;
        self
    }

    /// Build a policy from its serialized settings.
    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self::new(settings.max_attempts).with_backoff(BackoffStrategy::Exponential {
            base: Duration::from_millis(settings.backoff_ms),
            max: Duration::from_millis(settings.max_backoff_ms),
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Serialized form of a retry policy (the `[retry]` config section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 20,
            max_backoff_ms: 200,
        }
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy runs out of attempts.
///
/// `op` must build a fresh session on every call.
pub async fn retry_on_conflict<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    E: Retryable + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                let delay = policy.backoff.delay_for_attempt(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts = policy.max_attempts,
                    error = %e,
                    "transaction conflict, retrying in {:?}",
                    delay
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn conflict() -> StoreError {
        StoreError::Conflict {
            collection: "lots".to_string(),
            id: "l1".to_string(),
            expected: Some(1),
            actual: Some(2),
        }
    }

    #[test]
    fn test_exponential_backoff_is_capped() {
        let backoff = BackoffStrategy::Exponential {
            base: Duration::from_millis(10),
            max: Duration::from_millis(50),
        };
        assert_eq!(backoff.delay_for_attempt(0), Duration::from_millis(10));
        assert_eq!(backoff.delay_for_attempt(2), Duration::from_millis(40));
        assert_eq!(backoff.delay_for_attempt(5), Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_retries_conflicts_until_success() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3).with_backoff(BackoffStrategy::None);

        let result: Result<u32, StoreError> = retry_on_conflict(&policy, || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(conflict())
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_other_errors() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3).with_backoff(BackoffStrategy::None);

        let result: Result<(), StoreError> = retry_on_conflict(&policy, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Backend("down".to_string()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(2).with_backoff(BackoffStrategy::None);

        let result: Result<(), StoreError> = retry_on_conflict(&policy, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(conflict())
        })
        .await;

        assert!(result.unwrap_err().is_conflict());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
