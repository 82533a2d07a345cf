use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::api::{self, AppState};
use crate::cli::commands::ServeArgs;
use crate::config::{load_config, PortalConfig};
use crate::db::Database;
use crate::errors::{PortalError, RetryConfig};
use crate::notify::{Dispatcher, LogNotifier, Notifier, WebhookNotifier};
use crate::workflow::Portal;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire the database, the notification worker and the workflow together.
/// Must run inside a tokio runtime.
pub fn create_app_state(config: &PortalConfig, db_path: &str) -> Result<AppState, PortalError> {
    let db = Database::new(db_path)?;

    let notifier: Arc<dyn Notifier> = match config.webhook_url() {
        Some(url) => Arc::new(WebhookNotifier::new(url, WEBHOOK_TIMEOUT)?),
        None => Arc::new(LogNotifier),
    };
    info!(notifier = notifier.name(), "Notifications enabled");

    let retry = RetryConfig {
        max_retries: config.max_retries(),
        ..Default::default()
    };
    let (dispatcher, _worker) = Dispatcher::spawn(notifier, retry);

    Ok(AppState::new(Portal::new(db, dispatcher, config.workflow_policy())))
}

pub async fn handle_serve(args: ServeArgs) -> Result<(), PortalError> {
    let config = load_config(args.config.as_deref().map(Path::new)).await?;
    let host = args.host.as_deref().unwrap_or(config.host());
    let port = args.port.unwrap_or(config.port());
    let db_path = args.db.as_deref().unwrap_or(config.db_path());

    info!(host = %host, port, db = %db_path, "Starting API server");

    let state = create_app_state(&config, db_path)?;
    let app = api::build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| PortalError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
