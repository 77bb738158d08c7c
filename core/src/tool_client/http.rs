//! HTTP tool backend: `POST {server_url}/tools/{name}`

use super::{ToolCall, ToolClientError};
use guesstimate_tools::ToolResponse;
use std::time::Duration;
use tracing::debug;

const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Clone)]
pub struct HttpToolBackend {
    client: reqwest::Client,
    server_url: String,
    timeout: Duration,
}

impl HttpToolBackend {
    pub fn new(server_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            server_url: server_url.into(),
            timeout,
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn endpoint(&self, tool: &str) -> String {
        format!("{}/tools/{}", self.server_url.trim_end_matches('/'), tool)
    }

    pub(super) async fn send(&self, call: &ToolCall) -> Result<ToolResponse, ToolClientError> {
        let url = self.endpoint(call.name());
        debug!(url = %url, "POST tool");

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&call.arguments())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ToolClientError::Timeout(self.timeout)
                } else {
                    ToolClientError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolClientError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        response
            .json::<ToolResponse>()
            .await
            .map_err(|e| ToolClientError::Decode(e.to_string()))
    }
}
