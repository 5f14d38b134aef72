//! Invoice rendering configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceConfig {
    /// Directory rendered receipts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl InvoiceConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("INVOICES__OUTPUT_DIR"));
        }
        Ok(())
    }
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("invoices")
}
