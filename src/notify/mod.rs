//! Outbound notifications. Delivery is best-effort: the workflow enqueues and
//! moves on, and failures are only logged.

pub mod dispatcher;
pub mod webhook;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::errors::PortalError;

pub use dispatcher::Dispatcher;
pub use webhook::WebhookNotifier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub recipient: String,
    pub title: String,
    pub message: String,
    pub url: Option<String>,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn notify(&self, notification: &Notification) -> Result<(), PortalError>;
}

/// Writes notifications to the log instead of sending them anywhere.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, notification: &Notification) -> Result<(), PortalError> {
        info!(
            recipient = %notification.recipient,
            title = %notification.title,
            url = notification.url.as_deref().unwrap_or(""),
            "{}",
            notification.message
        );
        Ok(())
    }
}
