//! Bounded retry of whole store transactions with exponential backoff.
//!
//! Only failures the store reports as transient (lock contention, pool
//! exhaustion) are retried. Business errors such as `InsufficientStock`
//! return on the first attempt. Every retry opens a fresh transaction, so a
//! failed attempt never leaves partial writes behind.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::domain::order_management::OrderError;
use crate::observability::metrics;

/// Retry policy for store transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRetryPolicy {
    /// Total attempts including the first (default: 3).
    pub max_attempts: u32,
    /// Initial backoff duration (default: 20ms).
    pub initial_backoff: Duration,
    /// Maximum backoff duration (default: 500ms).
    pub max_backoff: Duration,
    /// Backoff multiplier for exponential growth (default: 2.0).
    pub backoff_multiplier: f64,
    /// Jitter factor for randomization (default: 0.2 = ±20%).
    pub jitter_factor: f64,
}

impl Default for TransactionRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(20),
            max_backoff: Duration::from_millis(500),
            backoff_multiplier: 2.0,
            jitter_factor: 0.2,
        }
    }
}

impl TransactionRetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }
}

/// Calculator for exponential backoff with jitter.
#[derive(Debug)]
pub struct ExponentialBackoffCalculator {
    current_retry: u32,
    max_retries: u32,
    initial_backoff_ms: u64,
    max_backoff_ms: u64,
    backoff_multiplier: f64,
    jitter_factor: f64,
}

impl ExponentialBackoffCalculator {
    /// Create a new backoff calculator from a retry policy.
    #[must_use]
    pub const fn new(policy: &TransactionRetryPolicy) -> Self {
        Self {
            current_retry: 0,
            max_retries: policy.max_attempts.saturating_sub(1),
            initial_backoff_ms: policy.initial_backoff.as_millis() as u64,
            max_backoff_ms: policy.max_backoff.as_millis() as u64,
            backoff_multiplier: policy.backoff_multiplier,
            jitter_factor: policy.jitter_factor,
        }
    }

    /// Get the next backoff duration with jitter.
    ///
    /// Returns `None` once the retry budget is spent.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if self.current_retry >= self.max_retries {
            return None;
        }

        let base_ms = self.calculate_base_backoff_ms();
        let capped_ms = self.apply_jitter(base_ms).min(self.max_backoff_ms);

        self.current_retry += 1;

        Some(Duration::from_millis(capped_ms))
    }

    /// Retries handed out so far.
    #[must_use]
    pub const fn retries(&self) -> u32 {
        self.current_retry
    }

    fn calculate_base_backoff_ms(&self) -> u64 {
        let multiplier = self.backoff_multiplier.powi(self.current_retry as i32);
        let backoff = (self.initial_backoff_ms as f64 * multiplier) as u64;
        backoff.min(self.max_backoff_ms)
    }

    /// Random value in `[backoff * (1 - jitter), backoff * (1 + jitter)]`.
    fn apply_jitter(&self, backoff_ms: u64) -> u64 {
        if self.jitter_factor <= 0.0 || backoff_ms == 0 {
            return backoff_ms;
        }
        let mut rng = rand::rng();
        let jitter_range = backoff_ms as f64 * self.jitter_factor;
        let min = (backoff_ms as f64 - jitter_range).max(0.0);
        let max = backoff_ms as f64 + jitter_range;
        rng.random_range(min..=max) as u64
    }
}

/// Run `attempt` until it succeeds, fails permanently or the budget runs out.
///
/// Exhausting the budget turns the last transient error into a permanent
/// `Store` error.
pub async fn with_transaction_retry<T, F, Fut>(
    policy: &TransactionRetryPolicy,
    operation: &'static str,
    mut attempt: F,
) -> Result<T, OrderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, OrderError>>,
{
    let mut backoff = ExponentialBackoffCalculator::new(policy);
    loop {
        match attempt().await {
            Err(err) if err.is_transient() => match backoff.next_backoff() {
                Some(delay) => {
                    warn!(
                        operation,
                        retry = backoff.retries(),
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient store failure, retrying"
                    );
                    metrics::record_transaction_retry(operation);
                    tokio::time::sleep(delay).await;
                }
                None => {
                    return Err(OrderError::store(format!(
                        "{operation} gave up after {} attempts: {err}",
                        backoff.retries() + 1
                    )));
                }
            },
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn no_jitter(max_attempts: u32) -> TransactionRetryPolicy {
        TransactionRetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(4),
            backoff_multiplier: 2.0,
            jitter_factor: 0.0,
        }
    }

    fn busy() -> OrderError {
        OrderError::Store {
            message: "database is locked".to_string(),
            transient: true,
        }
    }

    #[test]
    fn default_policy() {
        let policy = TransactionRetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_backoff, Duration::from_millis(20));
    }

    #[test]
    fn exponential_backoff_sequence_is_capped() {
        let mut backoff = ExponentialBackoffCalculator::new(&no_jitter(5));

        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(1)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(2)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(4)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(4)));
        assert!(backoff.next_backoff().is_none());
    }

    #[test]
    fn jitter_stays_in_range() {
        let policy = TransactionRetryPolicy {
            max_attempts: 100,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(1),
            backoff_multiplier: 1.0,
            jitter_factor: 0.2,
        };
        let mut backoff = ExponentialBackoffCalculator::new(&policy);
        for _ in 0..50 {
            let d = backoff.next_backoff().unwrap();
            assert!(d >= Duration::from_millis(80) && d <= Duration::from_millis(120));
        }
    }

    #[test]
    fn no_retry_policy_has_no_backoff() {
        let mut backoff = ExponentialBackoffCalculator::new(&TransactionRetryPolicy::no_retry());
        assert!(backoff.next_backoff().is_none());
    }

    #[tokio::test]
    async fn retries_transient_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = with_transaction_retry(&no_jitter(3), "test", move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(busy())
            } else {
                Ok(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_with_permanent_error() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), _> = with_transaction_retry(&no_jitter(3), "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(busy())
        })
        .await;

        let err = result.unwrap_err();
        assert!(!err.is_transient());
        assert!(err.to_string().contains("3 attempts"));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn business_errors_are_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), _> = with_transaction_retry(&no_jitter(3), "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(OrderError::invalid("quantity", "must be greater than 0"))
        })
        .await;

        assert!(matches!(result, Err(OrderError::InvalidArgument { .. })));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
