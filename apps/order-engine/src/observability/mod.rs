//! Observability module for metrics.
//!
//! Prometheus export of placement, stock and lifecycle counters. Log and
//! trace setup lives in [`crate::telemetry`].

pub mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_order_deleted, record_order_placed,
    record_placement_failure, record_status_transition, record_stock_rejection,
    record_transaction_retry,
};
