//! Background scheduling.

mod subscription_scheduler;

pub use subscription_scheduler::{SubscriptionScheduler, SubscriptionSchedulerConfig};
