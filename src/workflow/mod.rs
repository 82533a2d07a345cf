//! Report versioning and snapshot approval.
//!
//! - [`store`]: the mutable draft and its children.
//! - [`serializer`]: freezing a draft into a pending snapshot.
//! - [`moderation`]: pending/approved/denied transitions and signatures.
//! - [`publication`]: what each audience may see.

pub mod store;
pub mod serializer;
pub mod moderation;
pub mod publication;

use tracing::warn;

use crate::db::{users, Database};
use crate::models::Role;
use crate::notify::{Dispatcher, Notification};

/// Policy knobs for behaviour the workflow leaves open.
#[derive(Debug, Clone)]
pub struct WorkflowPolicy {
    /// Accept submissions for closed reports.
    pub allow_submit_when_closed: bool,
    /// Fixed recipient for approve/deny notices. When unset every vendor
    /// user is notified.
    pub vendor_recipient: Option<String>,
}

impl Default for WorkflowPolicy {
    fn default() -> Self {
        Self {
            allow_submit_when_closed: true,
            vendor_recipient: None,
        }
    }
}

/// Entry point for every workflow operation.
#[derive(Clone)]
pub struct Portal {
    db: Database,
    notifications: Dispatcher,
    policy: WorkflowPolicy,
}

impl Portal {
    pub fn new(db: Database, notifications: Dispatcher, policy: WorkflowPolicy) -> Self {
        Self { db, notifications, policy }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Best-effort: a lookup failure is logged and the notice dropped.
    fn recipients_with_role(&self, role: Role) -> Vec<String> {
        match self.db.read(|conn| users::emails_with_role(conn, role)) {
            Ok(emails) => emails,
            Err(e) => {
                warn!(role = %role, error = %e, "Could not resolve notification recipients");
                Vec::new()
            }
        }
    }

    fn vendor_recipients(&self) -> Vec<String> {
        match &self.policy.vendor_recipient {
            Some(recipient) => vec![recipient.clone()],
            None => self.recipients_with_role(Role::Vendor),
        }
    }

    fn notify_all(&self, recipients: Vec<String>, title: &str, message: &str, url: &str) {
        self.notifications.dispatch_all(recipients.into_iter().map(|recipient| Notification {
            recipient,
            title: title.to_string(),
            message: message.to_string(),
            url: Some(url.to_string()),
        }));
    }
}
