//! Post-commit side effects.
//!
//! Notifications and invoice rendering run only after the financial unit of
//! work committed. Failures are logged and never surface to the caller.

use std::sync::Arc;

use crate::domain::invoice::Invoice;
use crate::domain::notification::Notification;
use crate::ports::{InvoiceRenderer, NotificationSink, UnitOfWorkFactory};

/// Work collected during a unit of work, dispatched once it commits.
#[derive(Debug, Clone, Default)]
pub struct PostCommit {
    pub notifications: Vec<Notification>,
    pub invoices: Vec<Invoice>,
}

impl PostCommit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn notify_opt(&mut self, notification: Option<Notification>) {
        if let Some(n) = notification {
            self.notifications.push(n);
        }
    }

    pub fn render(&mut self, invoice: Invoice) {
        self.invoices.push(invoice);
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty() && self.invoices.is_empty()
    }
}

/// Dispatcher for [`PostCommit`] work.
#[derive(Clone)]
pub struct SideEffects {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    notifier: Arc<dyn NotificationSink>,
    renderer: Arc<dyn InvoiceRenderer>,
}

impl SideEffects {
    pub fn new(
        uow_factory: Arc<dyn UnitOfWorkFactory>,
        notifier: Arc<dyn NotificationSink>,
        renderer: Arc<dyn InvoiceRenderer>,
    ) -> Self {
        Self {
            uow_factory,
            notifier,
            renderer,
        }
    }

    pub async fn dispatch(&self, work: PostCommit) {
        for invoice in &work.invoices {
            self.render_invoice(invoice).await;
        }

        for notification in work.notifications {
            let recipient = notification.recipient;
            let kind = notification.kind;
            if let Err(e) = self.notifier.notify(notification).await {
                tracing::warn!(
                    recipient = %recipient,
                    kind = ?kind,
                    error = %e,
                    "Failed to deliver notification"
                );
            }
        }
    }

    async fn render_invoice(&self, invoice: &Invoice) {
        let path = match self.renderer.render(invoice).await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(invoice = %invoice.number, error = %e, "Failed to render invoice");
                return;
            }
        };

        let attached = async {
            let mut uow = self.uow_factory.begin().await?;
            uow.invoices().attach_file(invoice.id, &path).await?;
            uow.commit().await
        }
        .await;

        match attached {
            Ok(()) => tracing::debug!(invoice = %invoice.number, path = %path, "Invoice rendered"),
            Err(e) => tracing::warn!(
                invoice = %invoice.number,
                error = %e,
                "Failed to attach rendered invoice"
            ),
        }
    }
}
