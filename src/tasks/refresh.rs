//! Periodic Refresh Task
//!
//! Background task that re-runs a refresh on a fixed interval. Refreshes are
//! usually routed through `RequestCache::dedupe`, which keeps the cache
//! itself unaware of any schedule.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Spawns a background task that calls `refresh` every `period`.
///
/// The first call happens one full period after this function returns,
/// however late the task itself is first polled. A slow refresh
/// delays the next tick rather than causing a burst. Failures are logged
/// and the schedule carries on.
///
/// # Returns
/// A JoinHandle for the spawned task; abort it to stop refreshing.
///
/// # Example
/// ```ignore
/// let api = CustomerApi::new(&config)?;
/// let handle = spawn_refresh_task("restaurants", Duration::from_secs(60), move || {
///     let api = api.clone();
///     async move { api.restaurants().await }
/// });
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_refresh_task<F, Fut, T, E>(
    name: &'static str,
    period: Duration,
    mut refresh: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    let start = Instant::now() + period;

    tokio::spawn(async move {
        info!(task = name, period_secs = period.as_secs_f64(), "Starting refresh task");

        let mut ticker = interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match refresh().await {
                Ok(_) => debug!(task = name, "Refresh succeeded"),
                Err(err) => warn!(task = name, error = %err, "Refresh failed"),
            }
        }
    })
}
