//! Fixed-interval monitoring scheduler.
//!
//! [`MonitorScheduler`] runs as a background task and triggers
//! [`Monitor::run_once`] on every tick. A failed run is logged and the next
//! tick acts as the retry.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::monitor::Monitor;

/// Background service that runs the monitor periodically.
pub struct MonitorScheduler {
    monitor: Arc<Monitor>,
    interval: Duration,
}

impl MonitorScheduler {
    pub fn new(monitor: Arc<Monitor>, interval: Duration) -> Self {
        Self { monitor, interval }
    }

    /// Run the scheduler loop.
    ///
    /// The first run starts immediately. If a run outlasts the interval the
    /// next tick is delayed rather than fired in a burst. The loop exits
    /// when `cancel` is triggered; a run already in progress completes first.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            low_stock_threshold = self.monitor.thresholds().low_stock,
            "Inventory monitor scheduler started"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Inventory monitor scheduler stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.monitor.run_once(Utc::now()).await {
                        tracing::error!(error = %e, "Scheduled inventory monitoring run failed");
                    }
                }
            }
        }
    }
}
