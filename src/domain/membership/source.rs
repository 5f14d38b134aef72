use serde::{Deserialize, Serialize};

/// Where a subscription was initiated.
///
/// In-gym subscriptions are entered by an admin at the desk; online
/// subscriptions are self-service and may require manual proof review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipSource {
    InGym,
    Online,
}

impl MembershipSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipSource::InGym => "in_gym",
            MembershipSource::Online => "online",
        }
    }

    /// True when the request comes through the admin desk.
    pub fn is_admin_path(&self) -> bool {
        matches!(self, MembershipSource::InGym)
    }
}

impl std::fmt::Display for MembershipSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
