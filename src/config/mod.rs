//! Application configuration module
//!
//! Typed configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `GYM_BILLING` prefix and
//! `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use gym_billing::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod automation;
mod database;
mod error;
mod invoices;
mod payment;
mod server;

pub use automation::AutomationConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use invoices::InvoiceConfig;
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection (required)
    pub database: DatabaseConfig,

    /// Subscription sweep scheduling
    #[serde(default)]
    pub automation: AutomationConfig,

    /// Payment gateway selection
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Invoice receipt output
    #[serde(default)]
    pub invoices: InvoiceConfig,
}

impl AppConfig {
    /// Load configuration from the environment
    ///
    /// 1. Loads `.env` if present (development)
    /// 2. Reads variables with the `GYM_BILLING` prefix
    /// 3. Splits nested keys on `__`
    ///
    /// - `GYM_BILLING__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `GYM_BILLING__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Missing required variables or values of the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GYM_BILLING")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation of every section
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.automation.validate()?;
        self.payment.validate()?;
        self.invoices.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
