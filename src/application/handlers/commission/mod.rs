//! Trainer commission handlers.

mod list_trainer_commissions;
mod mark_commission_paid;

pub use list_trainer_commissions::{ListTrainerCommissionsHandler, ListTrainerCommissionsQuery};
pub use mark_commission_paid::{MarkCommissionPaidCommand, MarkCommissionPaidHandler};
