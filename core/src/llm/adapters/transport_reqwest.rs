//! Real HTTP transport using reqwest

use crate::llm::adapters::transport_types::{AdapterError, HttpTransport};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Default request timeout for completion calls
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Real HTTP transport using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create new transport with default timeout (30s)
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Create transport with custom timeout
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, AdapterError> {
        debug!(url, timeout_secs = self.timeout.as_secs(), body_len = body.len(), "POST");
        let mut request = self
            .client
            .post(url)
            .timeout(self.timeout)
            .body(body.to_string());

        for (key, value) in headers {
            request = request.header(*key, *value);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(url, status = status.as_u16(), "response");

        match status {
            StatusCode::UNAUTHORIZED => {
                return Err(AdapterError::Authentication("Invalid API key".to_string()))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .map(|v| format!(" (retry after {}s)", v))
                    .unwrap_or_default();
                return Err(AdapterError::RateLimited { retry_after });
            }
            s if !s.is_success() => {
                let message = response.text().await.unwrap_or_default();
                return Err(AdapterError::Http {
                    status: s.as_u16(),
                    message,
                });
            }
            _ => {}
        }

        Ok(response.text().await?)
    }
}
