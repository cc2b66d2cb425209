//! Retrying wrapper around any [`Provider`]

use crate::protocol::RequestConfig;
use crate::providers::adapter::{Provider, ProviderResponse};
use crate::providers::error::ProviderResult;
use crate::providers::retry::{classify_status, RetryConfig, RetryState, StatusClass};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Retries transient failures of the wrapped provider.
///
/// Transport errors that are [transient](crate::providers::ProviderError::is_transient)
/// and responses with a retryable status (429, 500, 502, 503, 504) are
/// retried until the [`RetryConfig`] budget runs out. Any other status is
/// returned immediately. When retries are exhausted the last response (or
/// error) is handed back unchanged.
///
/// Attempt count and last status are reset at the start of every call.
pub struct ReliableProvider<P> {
    inner: P,
    retry: RetryConfig,
    total_attempts: AtomicU32,
    last_status: AtomicU16,
}

impl<P: Provider> ReliableProvider<P> {
    pub fn new(inner: P, retry: RetryConfig) -> Self {
        Self {
            inner,
            retry,
            total_attempts: AtomicU32::new(0),
            last_status: AtomicU16::new(0),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Attempts made by the most recent `send_message` call
    pub fn total_attempts(&self) -> u32 {
        self.total_attempts.load(Ordering::Relaxed)
    }

    /// Status of the last HTTP response seen, if any
    pub fn last_status(&self) -> Option<u16> {
        match self.last_status.load(Ordering::Relaxed) {
            0 => None,
            status => Some(status),
        }
    }

    /// Clear telemetry; the wrapped provider is untouched
    pub fn reset(&self) {
        self.total_attempts.store(0, Ordering::Relaxed);
        self.last_status.store(0, Ordering::Relaxed);
    }
}

async fn wait(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl<P: Provider> Provider for ReliableProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn send_message(
        &self,
        config: &RequestConfig,
        messages_json: &str,
        tools_json: Option<&str>,
    ) -> ProviderResult<ProviderResponse> {
        self.reset();
        let mut state = RetryState::new(self.retry.clone());
        let provider = self.inner.name();

        loop {
            let attempt = self.total_attempts.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(provider, attempt, "attempting request");

            let response = match self
                .inner
                .send_message(config, messages_json, tools_json)
                .await
            {
                Ok(response) => response,
                Err(err) if err.is_transient() => match state.next_delay() {
                    Some(delay) => {
                        warn!(
                            provider,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "transport error, retrying"
                        );
                        wait(delay).await;
                        continue;
                    }
                    None => {
                        warn!(provider, attempt, error = %err, "retries exhausted");
                        return Err(err);
                    }
                },
                Err(err) => return Err(err),
            };

            let status = response.status;
            self.last_status.store(status, Ordering::Relaxed);

            match classify_status(status) {
                StatusClass::Success => {
                    info!(provider, attempt, status, "request succeeded");
                    return Ok(response);
                }
                StatusClass::Terminal => {
                    debug!(provider, attempt, status, "non-retryable status");
                    return Ok(response);
                }
                StatusClass::Retryable => match state.next_delay() {
                    Some(delay) => {
                        warn!(
                            provider,
                            attempt,
                            status,
                            delay_ms = delay.as_millis() as u64,
                            "retryable status, retrying"
                        );
                        drop(response);
                        wait(delay).await;
                    }
                    None => {
                        warn!(provider, attempt, status, "retries exhausted");
                        return Ok(response);
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::error::ProviderError;
    use std::sync::Mutex;

    /// Replays a fixed script of outcomes, one per call
    struct Scripted {
        script: Mutex<Vec<ProviderResult<ProviderResponse>>>,
    }

    impl Scripted {
        fn new(mut script: Vec<ProviderResult<ProviderResponse>>) -> Self {
            script.reverse();
            Self {
                script: Mutex::new(script),
            }
        }
    }

    #[async_trait]
    impl Provider for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn send_message(
            &self,
            _config: &RequestConfig,
            _messages_json: &str,
            _tools_json: Option<&str>,
        ) -> ProviderResult<ProviderResponse> {
            self.script
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(ProviderResponse::from_static(200, b"fallback")))
        }
    }

    fn config() -> RequestConfig {
        RequestConfig::new("m", "k")
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let provider = ReliableProvider::new(
            Scripted::new(vec![
                Ok(ProviderResponse::from_static(503, b"busy")),
                Ok(ProviderResponse::from_static(200, b"ok")),
            ]),
            RetryConfig::immediate(3),
        );
        let response = provider.send_message(&config(), "[]", None).await.unwrap();
        assert_eq!(response.body.as_ref(), b"ok");
        assert_eq!(provider.total_attempts(), 2);
        assert_eq!(provider.last_status(), Some(200));
    }

    #[tokio::test]
    async fn test_transport_error_exhausts() {
        let provider = ReliableProvider::new(
            Scripted::new(vec![
                Err(ProviderError::Network("refused".into())),
                Err(ProviderError::Timeout("slow".into())),
            ]),
            RetryConfig::immediate(1),
        );
        let err = provider.send_message(&config(), "[]", None).await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(_)));
        assert_eq!(provider.total_attempts(), 2);
        assert_eq!(provider.last_status(), None);
    }

    #[tokio::test]
    async fn test_non_transient_error_not_retried() {
        let provider = ReliableProvider::new(
            Scripted::new(vec![Err(ProviderError::InvalidRequest("bad".into()))]),
            RetryConfig::immediate(5),
        );
        assert!(provider.send_message(&config(), "[]", None).await.is_err());
        assert_eq!(provider.total_attempts(), 1);
    }

    #[tokio::test]
    async fn test_reset_clears_telemetry() {
        let provider = ReliableProvider::new(
            Scripted::new(vec![Ok(ProviderResponse::from_static(404, b""))]),
            RetryConfig::immediate(2),
        );
        provider.send_message(&config(), "[]", None).await.unwrap();
        assert_eq!(provider.last_status(), Some(404));
        provider.reset();
        assert_eq!(provider.total_attempts(), 0);
        assert_eq!(provider.last_status(), None);
        assert_eq!(provider.name(), "scripted");
    }
}
