//! Subscription automation.

mod run_subscription_sweep;

pub use run_subscription_sweep::{
    RunSubscriptionSweepCommand, RunSubscriptionSweepHandler, SweepReport,
};
