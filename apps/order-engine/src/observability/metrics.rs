//! Prometheus metrics for the order engine.
//!
//! Recording functions are cheap no-ops until [`init_metrics`] installs a
//! recorder, so tests and library callers never need to set one up.
//!
//! # Example
//!
//! ```ignore
//! use order_engine::observability::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_order_placed(0.012);
//! ```

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for latency measurements (in seconds).
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 9090)),
            // 1ms to 5s; placement is bounded by the transaction timeout
            latency_buckets: vec![
                0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
            ],
        }
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            ..Default::default()
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Placement
// ============================================================================

/// Record a committed order placement.
pub fn record_order_placed(latency_seconds: f64) {
    counter!("orders_placed_total").increment(1);
    histogram!("order_placement_duration_seconds", "outcome" => "placed").record(latency_seconds);
}

/// Record a failed placement.
///
/// * `reason` - Error kind (e.g., "insufficient_stock", "product_not_found", "timeout")
pub fn record_placement_failure(reason: &str, latency_seconds: f64) {
    counter!(
        "order_placement_failures_total",
        "reason" => reason.to_string()
    )
    .increment(1);
    histogram!("order_placement_duration_seconds", "outcome" => "failed").record(latency_seconds);
}

/// Record a conditional decrement that found too little stock.
pub fn record_stock_rejection() {
    counter!("stock_reservation_rejections_total").increment(1);
}

/// Record a whole-transaction retry after a transient store failure.
///
/// * `operation` - Retried operation (e.g., "place_order", "transition_status")
pub fn record_transaction_retry(operation: &str) {
    counter!(
        "order_placement_retries_total",
        "operation" => operation.to_string()
    )
    .increment(1);
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Record a committed status transition.
pub fn record_status_transition(from: &str, to: &str) {
    counter!(
        "order_status_transitions_total",
        "from" => from.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
}

/// Record an order deletion.
pub fn record_order_deleted() {
    counter!("orders_deleted_total").increment(1);
}
