//! Notification sink adapters.
//!
//! - `TracingNotificationSink` - writes notifications to the log
//! - `InMemoryNotificationSink` - records notifications for inspection

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::notification::Notification;
use crate::ports::NotificationSink;

/// Emits every notification as a structured log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl TracingNotificationSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for TracingNotificationSink {
    async fn notify(&self, notification: Notification) -> Result<(), DomainError> {
        tracing::info!(
            recipient = %notification.recipient,
            kind = ?notification.kind,
            title = %notification.title,
            message = %notification.message,
            "Notification"
        );
        Ok(())
    }
}

/// Keeps delivered notifications in memory.
#[derive(Debug, Default)]
pub struct InMemoryNotificationSink {
    sent: RwLock<Vec<Notification>>,
}

impl InMemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, in order.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .read()
            .map(|sent| sent.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn clear(&self) {
        match self.sent.write() {
            Ok(mut sent) => sent.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationSink {
    async fn notify(&self, notification: Notification) -> Result<(), DomainError> {
        match self.sent.write() {
            Ok(mut sent) => sent.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
        Ok(())
    }
}
