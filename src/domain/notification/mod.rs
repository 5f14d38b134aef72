use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    MembershipActivated,
    PaymentRejected,
    ExpiryReminder,
    MembershipExpired,
    AutoRenewed,
    AutoRenewSkipped,
    CommissionEarned,
}

/// A message queued for a user. Delivery is best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: Timestamp,
}

impl Notification {
    pub fn new(
        recipient: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            recipient,
            kind,
            title: title.into(),
            message: message.into(),
            created_at: Timestamp::now(),
        }
    }
}
