//! Dashboard Client - composition root
//!
//! Loads configuration, warms the cache, and relays live monitor events to
//! the log until shutdown.

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dashboard_client::ws::{MonitorEvent, MonitorMessage};
use dashboard_client::{spawn_cleanup_task, App, Config};

/// Main entry point for the dashboard client.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Wire cache, HTTP client and services
/// 4. Start background TTL cleanup task
/// 5. Preload dashboard and monitor data
/// 6. Open the monitor live connection when enabled
/// 7. Close everything on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Dashboard Client");

    let config = Config::from_env();
    info!(
        "Configuration loaded: api={}, timeout={}ms, reconnect={}x{}ms, cleanup_interval={}s, live={}",
        config.api_base_url,
        config.request_timeout_ms,
        config.ws_max_reconnect_attempts,
        config.ws_reconnect_delay_ms,
        config.cleanup_interval,
        config.monitor_live
    );

    let app = App::from_config(&config).context("failed to build client")?;

    let cleanup_handle = spawn_cleanup_task(app.cache.clone(), config.cleanup_period());
    info!("Background cleanup task started");

    let (dashboard, monitor) = app.preload().await;
    if !(dashboard.is_complete() && monitor.is_complete()) {
        warn!(
            "Preload incomplete: {} reads failed",
            dashboard.failed.len() + monitor.failed.len()
        );
    }

    let stats = app.dashboard.cache_stats().await;
    info!(
        "Cache warm: {} entries, {} hits, {} misses",
        stats.total_entries, stats.hits, stats.misses
    );

    if config.monitor_live {
        app.monitor
            .connect(log_event)
            .await
            .context("failed to open live connection")?;
    }

    shutdown_signal().await;

    if let Err(err) = app.monitor.disconnect().await {
        warn!("Live connection ended with error: {}", err);
    }
    cleanup_handle.abort();
    warn!("Cleanup task aborted");

    info!("Dashboard Client shutdown complete");
    Ok(())
}

fn log_event(event: MonitorEvent) {
    match event.message {
        MonitorMessage::StatsUpdate(stats) => info!(
            "monitor stats: {} clients, {} active connections",
            stats.total_clients, stats.active_connections
        ),
        MonitorMessage::ClientConnected(client) => {
            info!(
                "client connected: {} ({})",
                client.client_id, client.environment
            )
        }
        MonitorMessage::ClientDisconnected { client_id } => {
            info!("client disconnected: {}", client_id)
        }
        MonitorMessage::EnvironmentsUpdate(environments) => {
            info!("environments updated: {} known", environments.len())
        }
        MonitorMessage::Pong => info!("pong from {}", event.sender),
        MonitorMessage::Error { message } => {
            warn!("monitor error from {}: {}", event.sender, message)
        }
        MonitorMessage::Other(envelope) => {
            info!(
                "unhandled monitor message '{}' from {}",
                envelope.kind, event.sender
            )
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
