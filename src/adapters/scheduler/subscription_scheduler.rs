//! SubscriptionScheduler - Runs the subscription sweep on a fixed interval.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 1h | Time between sweeps |
//! | `run_on_start` | true | Sweep immediately instead of waiting one interval |
//!
//! ## Graceful Shutdown
//!
//! The loop listens on a watch channel. A sweep already in progress
//! finishes before the loop exits; no new sweep starts afterwards.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::application::handlers::automation::{
    RunSubscriptionSweepCommand, RunSubscriptionSweepHandler, SweepReport,
};
use crate::config::AutomationConfig;
use crate::domain::foundation::Timestamp;
use crate::domain::membership::MembershipError;

#[derive(Debug, Clone)]
pub struct SubscriptionSchedulerConfig {
    pub interval: Duration,
    pub run_on_start: bool,
}

impl Default for SubscriptionSchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
            run_on_start: true,
        }
    }
}

impl SubscriptionSchedulerConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_run_on_start(mut self, run_on_start: bool) -> Self {
        self.run_on_start = run_on_start;
        self
    }
}

impl From<&AutomationConfig> for SubscriptionSchedulerConfig {
    fn from(config: &AutomationConfig) -> Self {
        Self::default().with_interval(config.sweep_interval())
    }
}

pub struct SubscriptionScheduler {
    sweep: Arc<RunSubscriptionSweepHandler>,
    config: SubscriptionSchedulerConfig,
}

impl SubscriptionScheduler {
    pub fn new(sweep: Arc<RunSubscriptionSweepHandler>) -> Self {
        Self::with_config(sweep, SubscriptionSchedulerConfig::default())
    }

    pub fn with_config(
        sweep: Arc<RunSubscriptionSweepHandler>,
        config: SubscriptionSchedulerConfig,
    ) -> Self {
        Self { sweep, config }
    }

    /// Runs sweeps until the shutdown flag flips to `true`.
    ///
    /// A failed sweep is logged and retried on the next tick.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        if !self.config.run_on_start {
            interval.tick().await;
        }

        tracing::info!(interval_secs = self.config.interval.as_secs(), "Subscription scheduler started");
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Subscription scheduler stopping");
                        return;
                    }
                }

                _ = interval.tick() => {
                    if let Err(e) = self.poll_once().await {
                        tracing::error!(error = %e, "Subscription sweep failed");
                    }
                }
            }
        }
    }

    /// Runs exactly one sweep at the current time.
    pub async fn poll_once(&self) -> Result<SweepReport, MembershipError> {
        self.sweep
            .handle(RunSubscriptionSweepCommand {
                now: Timestamp::now(),
            })
            .await
    }
}
