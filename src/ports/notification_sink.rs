use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::notification::Notification;

/// Fire-and-forget notification delivery.
///
/// Called only after the financial unit of work has committed. Callers log
/// and continue on failure.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<(), DomainError>;
}
