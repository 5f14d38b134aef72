//! Invoice receipts for priced events.
//!
//! Invoice rows are written inside the financial unit of work; the rendered
//! file is produced afterwards and attached via `file_path`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BranchId, InvoiceId, MembershipId, Money, Timestamp, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceKind {
    MembershipPayment,
    Upgrade,
    AutoRenewal,
    AddOnPurchase,
}

impl InvoiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceKind::MembershipPayment => "membership_payment",
            InvoiceKind::Upgrade => "upgrade",
            InvoiceKind::AutoRenewal => "auto_renewal",
            InvoiceKind::AddOnPurchase => "add_on_purchase",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            InvoiceKind::MembershipPayment => "Membership payment",
            InvoiceKind::Upgrade => "Membership upgrade",
            InvoiceKind::AutoRenewal => "Membership auto-renewal",
            InvoiceKind::AddOnPurchase => "Add-on purchase",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    /// Human-facing number, `INV-YYYYMMDD-XXXXXXXX`.
    pub number: String,
    pub member_id: UserId,
    pub membership_id: Option<MembershipId>,
    pub branch_id: Option<BranchId>,
    pub kind: InvoiceKind,
    pub amount: Money,
    pub description: String,
    pub issued_at: Timestamp,
    pub file_path: Option<String>,
}

impl Invoice {
    pub fn issue(
        member_id: UserId,
        membership_id: Option<MembershipId>,
        branch_id: Option<BranchId>,
        kind: InvoiceKind,
        amount: Money,
        description: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        let id = InvoiceId::new();
        let suffix: String = id.as_uuid().simple().to_string()[..8].to_uppercase();
        Self {
            number: format!("INV-{}-{}", now.compact_date(), suffix),
            id,
            member_id,
            membership_id,
            branch_id,
            kind,
            amount,
            description: description.into(),
            issued_at: now,
            file_path: None,
        }
    }
}
