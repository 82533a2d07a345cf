use serde::{Deserialize, Serialize};

use crate::workflow::WorkflowPolicy;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DB_PATH: &str = "./ivv-portal.db";
pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PortalConfig {
    pub server: Option<ServerConfig>,
    pub database: Option<DatabaseConfig>,
    pub notifications: Option<NotificationConfig>,
    pub policy: Option<PolicyConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DatabaseConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct NotificationConfig {
    /// Notifications are POSTed here. Without it they are only logged.
    pub webhook_url: Option<String>,
    /// Who hears about approvals and denials. Defaults to every vendor user.
    pub vendor_recipient: Option<String>,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PolicyConfig {
    pub allow_submit_when_closed: Option<bool>,
}

impl PortalConfig {
    pub fn host(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.host.as_deref())
            .unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.server.as_ref().and_then(|s| s.port).unwrap_or(DEFAULT_PORT)
    }

    pub fn db_path(&self) -> &str {
        self.database
            .as_ref()
            .and_then(|d| d.path.as_deref())
            .unwrap_or(DEFAULT_DB_PATH)
    }

    pub fn webhook_url(&self) -> Option<&str> {
        self.notifications.as_ref().and_then(|n| n.webhook_url.as_deref())
    }

    pub fn max_retries(&self) -> u32 {
        self.notifications
            .as_ref()
            .and_then(|n| n.max_retries)
            .unwrap_or(DEFAULT_MAX_RETRIES)
    }

    pub fn workflow_policy(&self) -> WorkflowPolicy {
        let defaults = WorkflowPolicy::default();
        WorkflowPolicy {
            allow_submit_when_closed: self
                .policy
                .as_ref()
                .and_then(|p| p.allow_submit_when_closed)
                .unwrap_or(defaults.allow_submit_when_closed),
            vendor_recipient: self
                .notifications
                .as_ref()
                .and_then(|n| n.vendor_recipient.clone()),
        }
    }
}
