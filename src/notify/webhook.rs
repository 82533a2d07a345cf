use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{Notification, Notifier};
use crate::errors::PortalError;

/// POSTs each notification as JSON to a single endpoint.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PortalError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortalError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, url: url.into() })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn notify(&self, notification: &Notification) -> Result<(), PortalError> {
        let response = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await
            .map_err(|e| PortalError::Network(format!("Webhook request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(PortalError::Network(format!("Webhook returned {}", status)));
        }
        Err(PortalError::Config(format!(
            "Webhook rejected notification with {}",
            status
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode as AxumStatus, routing::post, Json, Router};
    use serde_json::Value;
    use tokio::sync::mpsc;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/hook", addr)
    }

    fn note() -> Notification {
        Notification {
            recipient: "vendor@example.com".into(),
            title: "Report approved".into(),
            message: "Your report 'R1' has been approved.".into(),
            url: Some("/reports/1".into()),
        }
    }

    #[tokio::test]
    async fn test_webhook_posts_json() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
        let router = Router::new()
            .route(
                "/hook",
                post(|State(tx): State<mpsc::UnboundedSender<Value>>, Json(body): Json<Value>| async move {
                    tx.send(body).unwrap();
                    AxumStatus::NO_CONTENT
                }),
            )
            .with_state(tx);
        let url = serve(router).await;

        let notifier = WebhookNotifier::new(url, Duration::from_secs(5)).unwrap();
        notifier.notify(&note()).await.unwrap();

        let body = rx.recv().await.unwrap();
        assert_eq!(body["recipient"], "vendor@example.com");
        assert_eq!(body["title"], "Report approved");
        assert_eq!(body["url"], "/reports/1");
    }

    #[tokio::test]
    async fn test_webhook_server_error_is_retryable() {
        let router = Router::new().route("/hook", post(|| async { AxumStatus::BAD_GATEWAY }));
        let url = serve(router).await;

        let notifier = WebhookNotifier::new(url, Duration::from_secs(5)).unwrap();
        let err = notifier.notify(&note()).await.unwrap_err();
        assert!(err.classify().retryable);
    }

    #[tokio::test]
    async fn test_webhook_client_error_not_retryable() {
        let router = Router::new().route("/hook", post(|| async { AxumStatus::NOT_FOUND }));
        let url = serve(router).await;

        let notifier = WebhookNotifier::new(url, Duration::from_secs(5)).unwrap();
        let err = notifier.notify(&note()).await.unwrap_err();
        assert!(!err.classify().retryable);
    }
}
