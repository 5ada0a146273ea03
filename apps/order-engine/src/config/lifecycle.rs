//! Order lifecycle and query configuration.

use serde::{Deserialize, Serialize};

use crate::application::retry::TransactionRetryPolicy;
use crate::application::use_cases::LifecycleSettings;
use crate::domain::order_management::TransitionPolicy;

/// Status machine options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Let admins jump forward along PENDING → PAID → SHIPPED → DELIVERED.
    #[serde(default)]
    pub allow_status_skip: bool,
    /// Return stock to the catalog when an order is cancelled.
    #[serde(default)]
    pub restock_on_cancel: bool,
}

impl LifecycleConfig {
    /// Settings for [`crate::application::use_cases::TransitionOrderStatusUseCase`].
    #[must_use]
    pub const fn settings(&self, retry: TransactionRetryPolicy) -> LifecycleSettings {
        LifecycleSettings {
            policy: TransitionPolicy {
                allow_status_skip: self.allow_status_skip,
            },
            restock_on_cancel: self.restock_on_cancel,
            retry,
        }
    }
}

/// Listing limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Largest page a caller may ask for.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_page_size: default_max_page_size(),
        }
    }
}

const fn default_max_page_size() -> u32 {
    100
}
