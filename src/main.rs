//! Table Cache - restaurant feed poller
//!
//! Keeps the restaurant list (and, when logged in, the unread notification
//! count) fresh through the request cache until interrupted.

use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use table_cache::{spawn_refresh_task, Config, CustomerApi};

/// Interval between cache statistics log lines
const STATS_INTERVAL: Duration = Duration::from_secs(60);

/// Main entry point for the poller.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the API client and warm the restaurant cache
/// 4. Start refresh tasks
/// 5. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "table_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Table Cache poller");

    let config = Config::from_env();
    info!(
        "Configuration loaded: api={}, default_ttl={}ms, restaurant_refresh={}s, notification_poll={}s, authenticated={}",
        config.api_base_url,
        config.default_ttl_ms,
        config.restaurant_refresh_secs,
        config.notification_poll_secs,
        config.api_token.is_some()
    );

    let api = CustomerApi::new(&config).context("failed to build API client")?;

    match api.restaurants().await {
        Ok(restaurants) => info!("Loaded {} restaurants", restaurants.len()),
        Err(err) => warn!("Initial restaurant load failed: {}", err),
    }

    let mut tasks = vec![spawn_refresh_task(
        "restaurants",
        config.restaurant_refresh_interval(),
        {
            let api = api.clone();
            move || {
                let api = api.clone();
                async move { api.restaurants().await }
            }
        },
    )];

    if api.is_authenticated() {
        tasks.push(spawn_refresh_task(
            "unread-notifications",
            config.notification_poll_interval(),
            {
                let api = api.clone();
                move || {
                    let api = api.clone();
                    async move {
                        let count = api.unread_count().await?;
                        info!("Unread notifications: {}", count);
                        Ok::<_, table_cache::ApiError>(count)
                    }
                }
            },
        ));
    }

    tasks.push(spawn_stats_logger(api.clone()));
    info!("Background tasks started");

    shutdown_signal(tasks).await;
    api.clear_caches();

    info!("Poller shutdown complete");
    Ok(())
}

/// Periodically logs cache statistics as JSON.
fn spawn_stats_logger(api: CustomerApi) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(STATS_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match serde_json::to_string(&api.stats()) {
                Ok(stats) => info!("Cache stats: {}", stats),
                Err(err) => warn!("Failed to serialize cache stats: {}", err),
            }
        }
    })
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then aborts the background tasks.
async fn shutdown_signal(tasks: Vec<JoinHandle<()>>) {
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

    for task in tasks {
        task.abort();
    }
    warn!("Background tasks aborted");
}
