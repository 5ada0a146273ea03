//! Order Engine Binary
//!
//! Starts the storefront order engine.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin order-engine
//! ```
//!
//! # Environment Variables
//!
//! - `ORDER_ENGINE_CONFIG`: Path to the YAML config (default: config.yaml)
//! - `RUST_LOG`: Log filter, overrides `observability.logging.level`
//!
//! Any `${VAR}` referenced from the config file is read from the environment
//! (or a `.env` file) as well.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use order_engine::application::ports::TracingEventPublisher;
use order_engine::config::{Config, load_config};
use order_engine::domain::catalog::ProductCatalog;
use order_engine::infrastructure::http::{AppState, create_router};
use order_engine::infrastructure::persistence::SqliteOrderStore;
use order_engine::observability::{MetricsConfig, init_metrics};
use order_engine::telemetry::init_telemetry;
use tokio::net::TcpListener;
use tokio::signal;

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = load_config(None).context("loading configuration")?;
    let _telemetry = init_telemetry(&config.observability);

    tracing::info!("Starting order engine");
    log_config(&config);

    if config.server.metrics_enabled {
        let addr = socket_addr(&config.server.bind_address, config.server.metrics_port)?;
        if let Err(e) = init_metrics(&MetricsConfig::with_addr(addr)) {
            tracing::warn!(error = %e, "Metrics exporter disabled");
        }
    }

    let store = Arc::new(
        SqliteOrderStore::connect(&config.persistence.sqlite_settings())
            .await
            .context("opening order store")?,
    );
    seed_catalog(&config, store.as_ref()).await?;

    start_http_server(&config, Arc::clone(&store)).await?;

    tokio::time::timeout(SHUTDOWN_TIMEOUT, store.close())
        .await
        .unwrap_or_else(|_| tracing::warn!("Timed out closing the order store"));

    tracing::info!("Order engine stopped");
    Ok(())
}

/// Log the loaded configuration.
fn log_config(config: &Config) {
    tracing::info!(
        http_port = config.server.http_port,
        database_url = %config.persistence.database_url,
        max_line_items = config.placement.max_line_items,
        transaction_timeout_ms = config.placement.transaction_timeout_ms,
        allow_status_skip = config.lifecycle.allow_status_skip,
        restock_on_cancel = config.lifecycle.restock_on_cancel,
        "Configuration loaded"
    );
}

fn socket_addr(bind_address: &str, port: u16) -> anyhow::Result<SocketAddr> {
    format!("{bind_address}:{port}")
        .parse()
        .with_context(|| format!("invalid bind address '{bind_address}:{port}'"))
}

/// Upsert the configured seed products.
async fn seed_catalog(config: &Config, catalog: &dyn ProductCatalog) -> anyhow::Result<()> {
    for seed in &config.catalog.seed {
        let product = seed
            .to_product()
            .with_context(|| format!("catalog seed '{}'", seed.id))?;
        catalog
            .upsert_product(&product)
            .await
            .with_context(|| format!("seeding product '{}'", seed.id))?;
    }
    if !config.catalog.seed.is_empty() {
        tracing::info!(products = config.catalog.seed.len(), "Catalog seeded");
    }
    Ok(())
}

/// Serve the HTTP API until a shutdown signal arrives.
async fn start_http_server(config: &Config, store: Arc<SqliteOrderStore>) -> anyhow::Result<()> {
    let retry = config.placement.retry.policy();
    let state = AppState::new(
        store,
        Arc::new(TracingEventPublisher),
        config.placement.settings(),
        config.lifecycle.settings(retry),
        config.query.max_page_size,
    );
    let app = create_router(state);

    let http_addr = socket_addr(&config.server.bind_address, config.server.http_port)?;

    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET    /health");
    tracing::info!("  POST   /api/v1/orders");
    tracing::info!("  GET    /api/v1/orders");
    tracing::info!("  GET    /api/v1/orders/{{id}}");
    tracing::info!("  POST   /api/v1/orders/{{id}}/cancel");
    tracing::info!("  PUT    /api/v1/admin/orders/{{id}}/status");
    tracing::info!("  DELETE /api/v1/admin/orders/{{id}}");

    let listener = TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("binding {http_addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    tracing::info!(
        timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
        "Graceful shutdown started"
    );
}
