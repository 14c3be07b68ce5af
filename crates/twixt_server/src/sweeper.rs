//! Background forfeit of stalled games.

use crate::registry::Registry;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, instrument};

/// Spawns a task that forfeits games idle for `timeout`, checking every
/// `interval`.
#[instrument(skip(registry))]
pub fn spawn_idle_sweeper(
    registry: Registry,
    timeout: Duration,
    interval: Duration,
) -> JoinHandle<()> {
    info!("Starting idle sweeper");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let forfeited = registry.forfeit_idle(Instant::now(), timeout);
            if !forfeited.is_empty() {
                info!(count = forfeited.len(), "Forfeited idle games");
            }
        }
    })
}
