//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `UnitOfWorkFactory` / `UnitOfWork` - transaction boundary
//! - one repository per entity, reached through the unit of work
//!
//! ## Collaborator Ports
//!
//! - `AccessPolicy` - role and ownership checks
//! - `NotificationSink` - best-effort member/trainer notifications
//! - `InvoiceRenderer` - best-effort invoice artifacts
//! - `PaymentGateway` - default payment classification per source

mod access_policy;
mod commission_repository;
mod invoice_renderer;
mod invoice_repository;
mod membership_repository;
mod notification_sink;
mod payment_gateway;
mod payment_repository;
mod plan_repository;
mod unit_of_work;
mod user_repository;
mod wallet_repository;

pub use access_policy::AccessPolicy;
pub use commission_repository::CommissionRepository;
pub use invoice_renderer::InvoiceRenderer;
pub use invoice_repository::InvoiceRepository;
pub use membership_repository::MembershipRepository;
pub use notification_sink::NotificationSink;
pub use payment_gateway::PaymentGateway;
pub use payment_repository::PaymentRepository;
pub use plan_repository::PlanRepository;
pub use unit_of_work::{UnitOfWork, UnitOfWorkFactory};
pub use user_repository::{TrainerAssignmentRepository, UserRepository};
pub use wallet_repository::WalletRepository;
