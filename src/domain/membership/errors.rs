//! Errors surfaced by the billing engine's operations.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | AlreadyOpen | 409 |
//! | InvalidState | 409 |
//! | ConcurrentDebit | 409 |
//! | InsufficientFunds | 400 |
//! | ValidationFailed | 400 |
//! | Forbidden | 403 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{
    CommissionId, DomainError, ErrorCategory, ErrorCode, MembershipId, Money, PlanId, UserId,
    ValidationError,
};

/// Errors returned by membership, wallet and commission operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    /// A referenced record does not exist.
    NotFound { code: ErrorCode, id: String },

    /// Member already holds a commercially open membership.
    AlreadyOpen(UserId),

    /// Wallet cannot cover a debit.
    InsufficientFunds { required: Money, available: Money },

    /// A concurrent debit drove the balance negative and was compensated.
    /// Safe to retry.
    ConcurrentDebit(UserId),

    /// Invalid state for the requested operation.
    InvalidState { current: String, attempted: String },

    /// Any other business rule violation.
    ValidationFailed {
        code: ErrorCode,
        field: String,
        message: String,
    },

    /// Role, ownership or branch-scope failure.
    Forbidden(String),

    /// Infrastructure error.
    Infrastructure(String),
}

impl MembershipError {
    pub fn not_found(id: MembershipId) -> Self {
        MembershipError::NotFound {
            code: ErrorCode::MembershipNotFound,
            id: id.to_string(),
        }
    }

    pub fn member_not_found(id: UserId) -> Self {
        MembershipError::NotFound {
            code: ErrorCode::MemberNotFound,
            id: id.to_string(),
        }
    }

    pub fn plan_not_found(id: PlanId) -> Self {
        MembershipError::NotFound {
            code: ErrorCode::PlanNotFound,
            id: id.to_string(),
        }
    }

    /// No pending payment exists for the membership.
    pub fn payment_not_found(membership_id: MembershipId) -> Self {
        MembershipError::NotFound {
            code: ErrorCode::PaymentNotFound,
            id: membership_id.to_string(),
        }
    }

    pub fn commission_not_found(id: CommissionId) -> Self {
        MembershipError::NotFound {
            code: ErrorCode::CommissionNotFound,
            id: id.to_string(),
        }
    }

    pub fn already_open(member_id: UserId) -> Self {
        MembershipError::AlreadyOpen(member_id)
    }

    pub fn insufficient_funds(required: Money, available: Money) -> Self {
        MembershipError::InsufficientFunds {
            required,
            available,
        }
    }

    pub fn concurrent_debit(member_id: UserId) -> Self {
        MembershipError::ConcurrentDebit(member_id)
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        MembershipError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        MembershipError::ValidationFailed {
            code: ErrorCode::ValidationFailed,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn branch_mismatch(message: impl Into<String>) -> Self {
        MembershipError::ValidationFailed {
            code: ErrorCode::BranchMismatch,
            field: "branch_id".to_string(),
            message: message.into(),
        }
    }

    pub fn duplicate_plan_name(name: impl Into<String>) -> Self {
        let name = name.into();
        MembershipError::ValidationFailed {
            code: ErrorCode::DuplicatePlanName,
            field: "name".to_string(),
            message: format!("A plan named '{}' already exists", name),
        }
    }

    pub fn commission_already_paid(id: CommissionId) -> Self {
        MembershipError::ValidationFailed {
            code: ErrorCode::CommissionAlreadyPaid,
            field: "commission_id".to_string(),
            message: format!("Commission {} is already paid", id),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        MembershipError::Forbidden(reason.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        MembershipError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            MembershipError::NotFound { code, .. } => *code,
            MembershipError::AlreadyOpen(_) => ErrorCode::MembershipAlreadyOpen,
            MembershipError::InsufficientFunds { .. } => ErrorCode::InsufficientFunds,
            MembershipError::ConcurrentDebit(_) => ErrorCode::ConcurrentDebit,
            MembershipError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            MembershipError::ValidationFailed { code, .. } => *code,
            MembershipError::Forbidden(_) => ErrorCode::Forbidden,
            MembershipError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.code().category()
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            MembershipError::NotFound { code, id } => {
                let what = match code {
                    ErrorCode::MemberNotFound => "Member",
                    ErrorCode::PlanNotFound => "Plan",
                    ErrorCode::PaymentNotFound => "Pending payment for membership",
                    ErrorCode::CommissionNotFound => "Commission",
                    ErrorCode::InvoiceNotFound => "Invoice",
                    _ => "Membership",
                };
                format!("{} not found: {}", what, id)
            }
            MembershipError::AlreadyOpen(member_id) => {
                format!("Member {} already has an open membership", member_id)
            }
            MembershipError::InsufficientFunds {
                required,
                available,
            } => format!(
                "Insufficient wallet balance: required {}, available {}",
                required, available
            ),
            MembershipError::ConcurrentDebit(member_id) => format!(
                "Concurrent wallet debit detected for member {}, please retry",
                member_id
            ),
            MembershipError::InvalidState { current, attempted } => {
                format!("Cannot {} membership in {} state", attempted, current)
            }
            MembershipError::ValidationFailed { field, message, .. } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            MembershipError::Forbidden(reason) => format!("Forbidden: {}", reason),
            MembershipError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MembershipError::ConcurrentDebit(_) | MembershipError::Infrastructure(_)
        )
    }
}

impl std::fmt::Display for MembershipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for MembershipError {}

impl From<DomainError> for MembershipError {
    fn from(err: DomainError) -> Self {
        match err.code.category() {
            ErrorCategory::NotFound => MembershipError::NotFound {
                code: err.code,
                id: err.details.get("id").cloned().unwrap_or(err.message),
            },
            ErrorCategory::Unauthorized => MembershipError::Forbidden(err.message),
            ErrorCategory::Infrastructure => MembershipError::Infrastructure(err.to_string()),
            ErrorCategory::Validation => match err.code {
                ErrorCode::MembershipAlreadyOpen => match err
                    .details
                    .get("member_id")
                    .and_then(|id| id.parse::<UserId>().ok())
                {
                    Some(member_id) => MembershipError::AlreadyOpen(member_id),
                    None => MembershipError::ValidationFailed {
                        code: err.code,
                        field: "member_id".to_string(),
                        message: err.message,
                    },
                },
                ErrorCode::InvalidStateTransition => MembershipError::InvalidState {
                    current: err
                        .details
                        .get("current")
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    attempted: err
                        .details
                        .get("attempted")
                        .cloned()
                        .unwrap_or_else(|| "transition".to_string()),
                },
                code => MembershipError::ValidationFailed {
                    code,
                    field: err
                        .details
                        .get("field")
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    message: err.message,
                },
            },
        }
    }
}

impl From<ValidationError> for MembershipError {
    fn from(err: ValidationError) -> Self {
        DomainError::from(err).into()
    }
}

impl From<MembershipError> for DomainError {
    fn from(err: MembershipError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================
    // Constructor Tests
    // ============================================================

    #[test]
    fn not_found_variants_carry_distinct_codes() {
        assert_eq!(
            MembershipError::not_found(MembershipId::new()).code(),
            ErrorCode::MembershipNotFound
        );
        assert_eq!(
            MembershipError::plan_not_found(PlanId::new()).code(),
            ErrorCode::PlanNotFound
        );
        assert_eq!(
            MembershipError::payment_not_found(MembershipId::new()).code(),
            ErrorCode::PaymentNotFound
        );
        assert_eq!(
            MembershipError::member_not_found(UserId::new()).category(),
            ErrorCategory::NotFound
        );
    }

    #[test]
    fn business_rule_violations_are_validation_category() {
        let member = UserId::new();
        for err in [
            MembershipError::already_open(member),
            MembershipError::insufficient_funds(Money::from_units(10), Money::ZERO),
            MembershipError::concurrent_debit(member),
            MembershipError::invalid_state("expired", "freeze"),
            MembershipError::branch_mismatch("plan is sold in another branch"),
            MembershipError::duplicate_plan_name("Gold"),
        ] {
            assert_eq!(err.category(), ErrorCategory::Validation, "{:?}", err);
        }
    }

    #[test]
    fn forbidden_is_unauthorized_category() {
        assert_eq!(
            MembershipError::forbidden("not your membership").category(),
            ErrorCategory::Unauthorized
        );
    }

    // ============================================================
    // Message Tests
    // ============================================================

    #[test]
    fn insufficient_funds_message_includes_amounts() {
        let err = MembershipError::insufficient_funds(Money::from_units(80), Money::from_cents(1250));
        let msg = err.message();
        assert!(msg.contains("80.00"));
        assert!(msg.contains("12.50"));
    }

    #[test]
    fn concurrent_debit_message_asks_for_retry() {
        let err = MembershipError::concurrent_debit(UserId::new());
        assert!(err.message().contains("retry"));
    }

    // ============================================================
    // Retryable Tests
    // ============================================================

    #[test]
    fn only_concurrent_debit_and_infrastructure_are_retryable() {
        assert!(MembershipError::concurrent_debit(UserId::new()).is_retryable());
        assert!(MembershipError::infrastructure("db down").is_retryable());
        assert!(!MembershipError::already_open(UserId::new()).is_retryable());
        assert!(!MembershipError::validation("reason", "required").is_retryable());
    }

    // ============================================================
    // Conversion Tests
    // ============================================================

    #[test]
    fn from_domain_error_preserves_invalid_state_details() {
        let domain = DomainError::new(ErrorCode::InvalidStateTransition, "nope")
            .with_detail("current", "expired")
            .with_detail("attempted", "frozen");
        let err: MembershipError = domain.into();
        assert_eq!(err, MembershipError::invalid_state("expired", "frozen"));
    }

    #[test]
    fn from_domain_error_preserves_validation_code() {
        let domain = DomainError::new(ErrorCode::MembershipAlreadyOpen, "duplicate open")
            .with_detail("field", "member_id");
        let err: MembershipError = domain.into();
        assert_eq!(err.code(), ErrorCode::MembershipAlreadyOpen);
    }

    #[test]
    fn store_conflict_with_member_becomes_already_open() {
        let member = UserId::new();
        let domain = DomainError::new(ErrorCode::MembershipAlreadyOpen, "duplicate open")
            .with_detail("member_id", member.to_string());
        let err: MembershipError = domain.into();
        assert_eq!(err, MembershipError::already_open(member));
    }

    #[test]
    fn from_domain_error_maps_database_to_infrastructure() {
        let err: MembershipError = DomainError::database("connection reset").into();
        assert!(matches!(err, MembershipError::Infrastructure(_)));
    }

    #[test]
    fn into_domain_error_keeps_code() {
        let domain: DomainError = MembershipError::plan_not_found(PlanId::new()).into();
        assert_eq!(domain.code, ErrorCode::PlanNotFound);
    }
}
