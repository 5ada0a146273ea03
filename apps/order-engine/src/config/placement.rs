//! Order placement configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::retry::TransactionRetryPolicy;
use crate::application::use_cases::PlacementSettings;

/// Placement limits and transaction retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Upper bound on one placement including retries, in milliseconds.
    #[serde(default = "default_transaction_timeout_ms")]
    pub transaction_timeout_ms: u64,
    /// Maximum lines per order.
    #[serde(default = "default_max_line_items")]
    pub max_line_items: usize,
    /// Retry of transient store failures.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            transaction_timeout_ms: default_transaction_timeout_ms(),
            max_line_items: default_max_line_items(),
            retry: RetryConfig::default(),
        }
    }
}

impl PlacementConfig {
    /// Settings for [`crate::application::use_cases::PlaceOrderUseCase`].
    #[must_use]
    pub fn settings(&self) -> PlacementSettings {
        PlacementSettings {
            transaction_timeout: Duration::from_millis(self.transaction_timeout_ms),
            max_line_items: self.max_line_items,
            retry: self.retry.policy(),
        }
    }
}

/// Transaction retry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// First backoff in milliseconds.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Backoff cap in milliseconds.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// Growth factor per retry.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Random spread around each backoff (0.2 = ±20%).
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter_factor: default_jitter_factor(),
        }
    }
}

impl RetryConfig {
    /// Convert to a retry policy.
    #[must_use]
    pub const fn policy(&self) -> TransactionRetryPolicy {
        TransactionRetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
            backoff_multiplier: self.backoff_multiplier,
            jitter_factor: self.jitter_factor,
        }
    }
}

const fn default_transaction_timeout_ms() -> u64 {
    5000
}

const fn default_max_line_items() -> usize {
    100
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    20
}

const fn default_max_backoff_ms() -> u64 {
    500
}

const fn default_backoff_multiplier() -> f64 {
    2.0
}

const fn default_jitter_factor() -> f64 {
    0.2
}
