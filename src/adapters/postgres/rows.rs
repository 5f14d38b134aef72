//! Database rows and their conversions into domain types.
//!
//! Enums are stored as their snake_case `as_str` names.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::commission::{Commission, CommissionSource};
use crate::domain::foundation::{
    BranchId, CommissionId, DomainError, ErrorCode, InvoiceId, MembershipId, Money, PaymentId,
    Percentage, PlanId, Timestamp, UserId, WalletTransactionId,
};
use crate::domain::invoice::{Invoice, InvoiceKind};
use crate::domain::membership::{Membership, MembershipPlan, MembershipSource, MembershipStatus};
use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::domain::people::{MemberProfile, RoleProfile, TrainerAssignment, TrainerProfile, UserAccount};
use crate::domain::wallet::{WalletTransaction, WalletTransactionType};

fn corrupt(column: &str, value: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value: {}", column, value),
    )
}

fn ts(dt: DateTime<Utc>) -> Timestamp {
    Timestamp::from_datetime(dt)
}

fn ts_opt(dt: Option<DateTime<Utc>>) -> Option<Timestamp> {
    dt.map(Timestamp::from_datetime)
}

fn percentage(column: &str, value: Decimal) -> Result<Percentage, DomainError> {
    Percentage::try_new(value).map_err(|_| corrupt(column, value))
}

fn count(column: &str, value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| corrupt(column, value))
}

// ════════════════════════════════════════════════════════════════════════════
// Enum codecs
// ════════════════════════════════════════════════════════════════════════════

pub(super) fn parse_membership_status(s: &str) -> Result<MembershipStatus, DomainError> {
    match s {
        "pending_payment" => Ok(MembershipStatus::PendingPayment),
        "active" => Ok(MembershipStatus::Active),
        "frozen" => Ok(MembershipStatus::Frozen),
        "expired" => Ok(MembershipStatus::Expired),
        "cancelled" => Ok(MembershipStatus::Cancelled),
        other => Err(corrupt("membership status", other)),
    }
}

fn parse_source(s: &str) -> Result<MembershipSource, DomainError> {
    match s {
        "in_gym" => Ok(MembershipSource::InGym),
        "online" => Ok(MembershipSource::Online),
        other => Err(corrupt("membership source", other)),
    }
}

fn parse_payment_status(s: &str) -> Result<PaymentStatus, DomainError> {
    match s {
        "pending" => Ok(PaymentStatus::Pending),
        "paid" => Ok(PaymentStatus::Paid),
        "confirmed" => Ok(PaymentStatus::Confirmed),
        "rejected" => Ok(PaymentStatus::Rejected),
        other => Err(corrupt("payment status", other)),
    }
}

fn parse_commission_source(s: &str) -> Result<CommissionSource, DomainError> {
    match s {
        "activation" => Ok(CommissionSource::Activation),
        "renewal" => Ok(CommissionSource::Renewal),
        other => Err(corrupt("commission source", other)),
    }
}

fn parse_invoice_kind(s: &str) -> Result<InvoiceKind, DomainError> {
    match s {
        "membership_payment" => Ok(InvoiceKind::MembershipPayment),
        "upgrade" => Ok(InvoiceKind::Upgrade),
        "auto_renewal" => Ok(InvoiceKind::AutoRenewal),
        "add_on_purchase" => Ok(InvoiceKind::AddOnPurchase),
        other => Err(corrupt("invoice kind", other)),
    }
}

pub(super) fn role_name(profile: &RoleProfile) -> &'static str {
    match profile {
        RoleProfile::Member(_) => "member",
        RoleProfile::Trainer(_) => "trainer",
        RoleProfile::Admin => "admin",
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Rows
// ════════════════════════════════════════════════════════════════════════════

pub(super) const USER_COLUMNS: &str =
    "id, full_name, email, branch_id, is_active, role, wallet_balance, specialization, created_at";

#[derive(Debug, sqlx::FromRow)]
pub(super) struct UserRow {
    id: Uuid,
    full_name: String,
    email: String,
    branch_id: Option<Uuid>,
    is_active: bool,
    role: String,
    wallet_balance: Option<Decimal>,
    specialization: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserAccount {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let profile = match row.role.as_str() {
            "member" => RoleProfile::Member(MemberProfile {
                wallet_balance: row.wallet_balance.map(Money::new).unwrap_or(Money::ZERO),
                joined_at: ts(row.created_at),
            }),
            "trainer" => RoleProfile::Trainer(TrainerProfile {
                specialization: row.specialization,
            }),
            "admin" => RoleProfile::Admin,
            other => return Err(corrupt("role", other)),
        };
        Ok(UserAccount {
            id: UserId::from_uuid(row.id),
            full_name: row.full_name,
            email: row.email,
            branch_id: row.branch_id.map(BranchId::from_uuid),
            is_active: row.is_active,
            profile,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct AssignmentRow {
    member_id: Uuid,
    trainer_id: Uuid,
    assigned_at: DateTime<Utc>,
}

impl From<AssignmentRow> for TrainerAssignment {
    fn from(row: AssignmentRow) -> Self {
        TrainerAssignment {
            member_id: UserId::from_uuid(row.member_id),
            trainer_id: UserId::from_uuid(row.trainer_id),
            assigned_at: ts(row.assigned_at),
        }
    }
}

pub(super) const PLAN_COLUMNS: &str = "id, name, branch_id, duration_days, price, session_discount, \
     sessions_per_month, priority_booking, add_on_access, commission_rate, is_active, is_deleted, \
     created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub(super) struct PlanRow {
    id: Uuid,
    name: String,
    branch_id: Option<Uuid>,
    duration_days: i32,
    price: Decimal,
    session_discount: Decimal,
    sessions_per_month: i32,
    priority_booking: bool,
    add_on_access: bool,
    commission_rate: Decimal,
    is_active: bool,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PlanRow> for MembershipPlan {
    type Error = DomainError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        Ok(MembershipPlan {
            id: PlanId::from_uuid(row.id),
            name: row.name,
            branch_id: row.branch_id.map(BranchId::from_uuid),
            duration_days: count("duration_days", row.duration_days)?,
            price: Money::new(row.price),
            session_discount: percentage("session_discount", row.session_discount)?,
            sessions_per_month: count("sessions_per_month", row.sessions_per_month)?,
            priority_booking: row.priority_booking,
            add_on_access: row.add_on_access,
            commission_rate: percentage("commission_rate", row.commission_rate)?,
            is_active: row.is_active,
            is_deleted: row.is_deleted,
            created_at: ts(row.created_at),
            updated_at: ts(row.updated_at),
        })
    }
}

pub(super) const MEMBERSHIP_COLUMNS: &str = "id, member_id, plan_id, branch_id, start_date, end_date, \
     status, source, auto_renew, total_paid, wallet_contribution, freeze_start, freeze_end, \
     created_at, updated_at, cancelled_at";

#[derive(Debug, sqlx::FromRow)]
pub(super) struct MembershipRow {
    id: Uuid,
    member_id: Uuid,
    plan_id: Uuid,
    branch_id: Option<Uuid>,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    status: String,
    source: String,
    auto_renew: bool,
    total_paid: Decimal,
    wallet_contribution: Decimal,
    freeze_start: Option<DateTime<Utc>>,
    freeze_end: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    cancelled_at: Option<DateTime<Utc>>,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = DomainError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        Ok(Membership {
            id: MembershipId::from_uuid(row.id),
            member_id: UserId::from_uuid(row.member_id),
            plan_id: PlanId::from_uuid(row.plan_id),
            branch_id: row.branch_id.map(BranchId::from_uuid),
            start_date: ts(row.start_date),
            end_date: ts(row.end_date),
            status: parse_membership_status(&row.status)?,
            source: parse_source(&row.source)?,
            auto_renew: row.auto_renew,
            total_paid: Money::new(row.total_paid),
            wallet_contribution: Money::new(row.wallet_contribution),
            freeze_start: ts_opt(row.freeze_start),
            freeze_end: ts_opt(row.freeze_end),
            created_at: ts(row.created_at),
            updated_at: ts(row.updated_at),
            cancelled_at: ts_opt(row.cancelled_at),
        })
    }
}

pub(super) const PAYMENT_COLUMNS: &str = "id, membership_id, member_id, amount, method, status, \
     proof_url, paid_at, reviewed_at, reviewed_by, rejection_reason, created_at";

#[derive(Debug, sqlx::FromRow)]
pub(super) struct PaymentRow {
    id: Uuid,
    membership_id: Uuid,
    member_id: Uuid,
    amount: Decimal,
    method: String,
    status: String,
    proof_url: Option<String>,
    paid_at: Option<DateTime<Utc>>,
    reviewed_at: Option<DateTime<Utc>>,
    reviewed_by: Option<Uuid>,
    rejection_reason: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let method: PaymentMethod = row
            .method
            .parse()
            .map_err(|_| corrupt("payment method", &row.method))?;
        Ok(Payment {
            id: PaymentId::from_uuid(row.id),
            membership_id: MembershipId::from_uuid(row.membership_id),
            member_id: UserId::from_uuid(row.member_id),
            amount: Money::new(row.amount),
            method,
            status: parse_payment_status(&row.status)?,
            proof_url: row.proof_url,
            paid_at: ts_opt(row.paid_at),
            reviewed_at: ts_opt(row.reviewed_at),
            reviewed_by: row.reviewed_by.map(UserId::from_uuid),
            rejection_reason: row.rejection_reason,
            created_at: ts(row.created_at),
        })
    }
}

pub(super) const WALLET_COLUMNS: &str =
    "id, member_id, amount, transaction_type, reference_id, description, created_by, created_at";

#[derive(Debug, sqlx::FromRow)]
pub(super) struct WalletRow {
    id: Uuid,
    member_id: Uuid,
    amount: Decimal,
    transaction_type: String,
    reference_id: Option<Uuid>,
    description: String,
    created_by: Uuid,
    created_at: DateTime<Utc>,
}

impl TryFrom<WalletRow> for WalletTransaction {
    type Error = DomainError;

    fn try_from(row: WalletRow) -> Result<Self, Self::Error> {
        let transaction_type = WalletTransactionType::parse(&row.transaction_type)
            .ok_or_else(|| corrupt("transaction type", &row.transaction_type))?;
        Ok(WalletTransaction {
            id: WalletTransactionId::from_uuid(row.id),
            member_id: UserId::from_uuid(row.member_id),
            amount: Money::new(row.amount),
            transaction_type,
            reference_id: row.reference_id,
            description: row.description,
            created_by: UserId::from_uuid(row.created_by),
            created_at: ts(row.created_at),
        })
    }
}

pub(super) const COMMISSION_COLUMNS: &str = "id, trainer_id, membership_id, branch_id, source, \
     percentage, amount, is_paid, paid_at, paid_by, created_at";

#[derive(Debug, sqlx::FromRow)]
pub(super) struct CommissionRow {
    id: Uuid,
    trainer_id: Uuid,
    membership_id: Uuid,
    branch_id: Option<Uuid>,
    source: String,
    percentage: Decimal,
    amount: Decimal,
    is_paid: bool,
    paid_at: Option<DateTime<Utc>>,
    paid_by: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CommissionRow> for Commission {
    type Error = DomainError;

    fn try_from(row: CommissionRow) -> Result<Self, Self::Error> {
        Ok(Commission {
            id: CommissionId::from_uuid(row.id),
            trainer_id: UserId::from_uuid(row.trainer_id),
            membership_id: MembershipId::from_uuid(row.membership_id),
            branch_id: row.branch_id.map(BranchId::from_uuid),
            source: parse_commission_source(&row.source)?,
            percentage: percentage("percentage", row.percentage)?,
            amount: Money::new(row.amount),
            is_paid: row.is_paid,
            paid_at: ts_opt(row.paid_at),
            paid_by: row.paid_by.map(UserId::from_uuid),
            created_at: ts(row.created_at),
        })
    }
}

pub(super) const INVOICE_COLUMNS: &str = "id, number, member_id, membership_id, branch_id, kind, \
     amount, description, issued_at, file_path";

#[derive(Debug, sqlx::FromRow)]
pub(super) struct InvoiceRow {
    id: Uuid,
    number: String,
    member_id: Uuid,
    membership_id: Option<Uuid>,
    branch_id: Option<Uuid>,
    kind: String,
    amount: Decimal,
    description: String,
    issued_at: DateTime<Utc>,
    file_path: Option<String>,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = DomainError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        Ok(Invoice {
            id: InvoiceId::from_uuid(row.id),
            number: row.number,
            member_id: UserId::from_uuid(row.member_id),
            membership_id: row.membership_id.map(MembershipId::from_uuid),
            branch_id: row.branch_id.map(BranchId::from_uuid),
            kind: parse_invoice_kind(&row.kind)?,
            amount: Money::new(row.amount),
            description: row.description,
            issued_at: ts(row.issued_at),
            file_path: row.file_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codec_matches_domain_names() {
        for status in [
            MembershipStatus::PendingPayment,
            MembershipStatus::Active,
            MembershipStatus::Frozen,
            MembershipStatus::Expired,
            MembershipStatus::Cancelled,
        ] {
            assert_eq!(parse_membership_status(status.as_str()).unwrap(), status);
        }
        assert!(parse_membership_status("paused").is_err());
    }

    #[test]
    fn invoice_and_commission_codecs_match_domain_names() {
        for kind in [
            InvoiceKind::MembershipPayment,
            InvoiceKind::Upgrade,
            InvoiceKind::AutoRenewal,
            InvoiceKind::AddOnPurchase,
        ] {
            assert_eq!(parse_invoice_kind(kind.as_str()).unwrap(), kind);
        }
        for source in [CommissionSource::Activation, CommissionSource::Renewal] {
            assert_eq!(parse_commission_source(source.as_str()).unwrap(), source);
        }
    }

    #[test]
    fn member_row_becomes_member_account() {
        let row = UserRow {
            id: Uuid::new_v4(),
            full_name: "Mona".to_string(),
            email: "mona@gym.test".to_string(),
            branch_id: None,
            is_active: true,
            role: "member".to_string(),
            wallet_balance: Some(Decimal::new(1250, 2)),
            specialization: None,
            created_at: Utc::now(),
        };

        let account = UserAccount::try_from(row).unwrap();
        assert_eq!(
            account.member_profile().unwrap().wallet_balance,
            Money::from_cents(1250)
        );
    }

    #[test]
    fn negative_duration_is_corrupt() {
        let now = Utc::now();
        let row = PlanRow {
            id: Uuid::new_v4(),
            name: "Gold".to_string(),
            branch_id: None,
            duration_days: -1,
            price: Decimal::ONE_HUNDRED,
            session_discount: Decimal::ZERO,
            sessions_per_month: 0,
            priority_booking: false,
            add_on_access: false,
            commission_rate: Decimal::TEN,
            is_active: true,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        let err = MembershipPlan::try_from(row).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
