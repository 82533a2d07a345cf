use std::future::Future;
use std::time::Duration;

use super::classification::ErrorClassification;
use super::types::PortalError;
use tracing::{debug, warn};

const MAX_DELAY: Duration = Duration::from_secs(30);

impl ErrorClassification {
    /// Exponential backoff `base * 2^attempt` plus up to one `base` of jitter,
    /// capped at 30s. `attempt` is 0-indexed.
    pub fn retry_delay(&self, attempt: u32, base: Duration) -> Duration {
        let factor = 2_f64.powi(attempt.min(16) as i32);
        let jitter: f64 = rand::random::<f64>();
        let secs = base.as_secs_f64() * (factor + jitter);
        Duration::from_secs_f64(secs).min(MAX_DELAY)
    }
}

/// Retry policy for outbound notification delivery.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Execute an async operation, retrying while the error classifies as
/// retryable and attempts remain.
pub async fn with_retry<F, Fut, T>(
    operation_name: &str,
    config: &RetryConfig,
    mut factory: F,
) -> Result<T, PortalError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PortalError>>,
{
    let max_attempts = config.max_retries + 1;
    let mut attempt = 0;

    loop {
        match factory().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                let classification = e.classify();

                if !classification.retryable {
                    debug!(
                        operation = operation_name,
                        error_type = classification.error_type,
                        "Non-retryable error, failing immediately"
                    );
                    return Err(e);
                }
                if attempt + 1 >= max_attempts {
                    warn!(
                        operation = operation_name,
                        attempts = attempt + 1,
                        "Max retries exhausted"
                    );
                    return Err(e);
                }

                let delay = classification.retry_delay(attempt, config.base_delay);
                warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    max = max_attempts,
                    error_type = classification.error_type,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Retrying after error"
                );

                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
