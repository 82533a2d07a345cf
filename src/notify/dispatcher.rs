use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::{Notification, Notifier};
use crate::errors::{with_retry, RetryConfig};

/// Fire-and-forget handle used by the workflow. Cloning shares the queue.
#[derive(Clone)]
pub struct Dispatcher {
    tx: UnboundedSender<Notification>,
}

impl Dispatcher {
    /// Start a background worker that delivers queued notifications through
    /// `notifier`. Must be called from inside a tokio runtime.
    pub fn spawn(notifier: Arc<dyn Notifier>, retry: RetryConfig) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_worker(rx, notifier, retry));
        (Self { tx }, handle)
    }

    /// A dispatcher whose queue is handed to the caller, for inspection.
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Enqueue without waiting. Never fails the caller.
    pub fn dispatch(&self, notification: Notification) {
        let recipient = notification.recipient.clone();
        if self.tx.send(notification).is_err() {
            warn!(recipient = %recipient, "Notification worker is gone, dropping notification");
        }
    }

    pub fn dispatch_all(&self, notifications: impl IntoIterator<Item = Notification>) {
        for notification in notifications {
            self.dispatch(notification);
        }
    }
}

async fn run_worker(
    mut rx: UnboundedReceiver<Notification>,
    notifier: Arc<dyn Notifier>,
    retry: RetryConfig,
) {
    while let Some(notification) = rx.recv().await {
        let result = with_retry("notify", &retry, || notifier.notify(&notification)).await;
        match result {
            Ok(()) => debug!(
                notifier = notifier.name(),
                recipient = %notification.recipient,
                "Notification delivered"
            ),
            Err(e) => error!(
                notifier = notifier.name(),
                recipient = %notification.recipient,
                title = %notification.title,
                error = %e,
                "Notification delivery failed"
            ),
        }
    }
    debug!("Notification queue closed, worker exiting");
}
