//! Subscription automation configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Settings for the background subscription sweep
#[derive(Debug, Clone, Deserialize)]
pub struct AutomationConfig {
    /// Run the scheduler at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Seconds between sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Days ahead of expiry that reminders are sent
    #[serde(default = "default_expiry_warning_days")]
    pub expiry_warning_days: u32,
}

impl AutomationConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(60..=86_400).contains(&self.sweep_interval_secs) {
            return Err(ValidationError::InvalidSweepInterval);
        }
        if self.expiry_warning_days > 30 {
            return Err(ValidationError::InvalidWarningWindow);
        }
        Ok(())
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            sweep_interval_secs: default_sweep_interval(),
            expiry_warning_days: default_expiry_warning_days(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_sweep_interval() -> u64 {
    3600
}

fn default_expiry_warning_days() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_sweep_hourly_with_three_day_warning() {
        let config = AutomationConfig::default();
        assert!(config.enabled);
        assert_eq!(config.sweep_interval(), Duration::from_secs(3600));
        assert_eq!(config.expiry_warning_days, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn too_frequent_sweep_is_rejected() {
        let config = AutomationConfig {
            sweep_interval_secs: 5,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSweepInterval));
    }

    #[test]
    fn month_long_warning_window_is_the_limit() {
        let config = AutomationConfig {
            expiry_warning_days: 31,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidWarningWindow));
    }
}
