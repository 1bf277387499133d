//! computer-catalog server entry point.
//!
//! Connects both datasources, starts the metrics collector and serves the
//! HTTP API until Ctrl-C or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use computer_catalog::api;
use computer_catalog::app_state::AppState;
use computer_catalog::config::CatalogConfig;
use computer_catalog::monitoring::{MetricsCollector, MetricsRegistry, MetricsStore};
use computer_catalog::persistence::{DataSource, PRIMARY_CLIENT_NAME, REPLICA_CLIENT_NAME};
use computer_catalog::service::{ComputerReadService, ComputerWriteService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Load configuration
    let config = CatalogConfig::from_env().context("invalid configuration")?;
    tracing::info!(addr = %config.listen_addr, "starting computer-catalog");

    // Metrics
    let metrics = Arc::new(MetricsRegistry::new().context("metrics registry")?);
    let metrics_store = Arc::new(MetricsStore::new(config.metrics_history_capacity));

    // Datasources
    let primary = DataSource::connect(PRIMARY_CLIENT_NAME, &config.primary, &metrics)
        .await
        .context("primary datasource")?;
    let replica = DataSource::connect(REPLICA_CLIENT_NAME, &config.replica, &metrics)
        .await
        .context("replica datasource")?;

    // Collector
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let collector = MetricsCollector::new(Arc::clone(&metrics), Arc::clone(&metrics_store));
    let collector_handle =
        collector.spawn(Duration::from_secs(config.metrics_interval_secs), shutdown_rx);

    // Build application state
    let app_state = AppState {
        read_service: Arc::new(ComputerReadService::new(replica.clone())),
        write_service: Arc::new(ComputerWriteService::new(primary.clone())),
        metrics,
        metrics_store,
    };

    // Build router
    let app = api::build_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_secs,
            ))),
    );

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain
    let _ = shutdown_tx.send(());
    if let Err(e) = collector_handle.await {
        tracing::warn!(error = %e, "metrics collector task failed");
    }
    primary.close().await;
    replica.close().await;
    tracing::info!("shutdown complete");

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("received shutdown signal");
}
