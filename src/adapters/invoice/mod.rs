//! Invoice renderer adapters.

mod file_renderer;

pub use file_renderer::FileInvoiceRenderer;
