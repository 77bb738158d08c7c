//! Tool client
//!
//! Sends one named tool invocation to a backend and normalizes whatever
//! comes back into a [`ToolOutcome`]. No retries: one attempt, bounded by
//! the client timeout. Transport errors, non-2xx replies, timeouts and
//! `success: false` envelopes all surface as [`ToolOutcome::Failure`].

pub mod fake;
pub mod http;
pub mod local;

pub use fake::{FakeReply, FakeToolBackend};
pub use http::HttpToolBackend;
pub use local::LocalToolBackend;

use crate::config::{ToolMode, ToolsConfig};
use guesstimate_tools::{SearchConfig, ToolRegistry, ToolResponse, CALCULATOR, WEB_SEARCH};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// A tool invocation with its required arguments
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    Calculator { expression: String },
    WebSearch { query: String },
}

impl ToolCall {
    pub fn calculator(expression: impl Into<String>) -> Self {
        ToolCall::Calculator {
            expression: expression.into(),
        }
    }

    pub fn web_search(query: impl Into<String>) -> Self {
        ToolCall::WebSearch {
            query: query.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::Calculator { .. } => CALCULATOR,
            ToolCall::WebSearch { .. } => WEB_SEARCH,
        }
    }

    pub fn arguments(&self) -> Value {
        match self {
            ToolCall::Calculator { expression } => json!({ "expression": expression }),
            ToolCall::WebSearch { query } => json!({ "query": query }),
        }
    }

    /// The single argument value, for logging
    pub fn input(&self) -> &str {
        match self {
            ToolCall::Calculator { expression } => expression,
            ToolCall::WebSearch { query } => query,
        }
    }
}

/// Normalized tool result
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(String),
    Failure(String),
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success(_))
    }

}

impl From<ToolResponse> for ToolOutcome {
    fn from(response: ToolResponse) -> Self {
        match (response.success, response.error) {
            (true, None) => ToolOutcome::Success(response.result),
            (_, Some(error)) => ToolOutcome::Failure(error),
            (false, None) => ToolOutcome::Failure("Unknown error".to_string()),
        }
    }
}

/// Serializes as the `{success, result, error}` envelope
impl Serialize for ToolOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ToolOutcome", 3)?;
        match self {
            ToolOutcome::Success(text) => {
                s.serialize_field("success", &true)?;
                s.serialize_field("result", text)?;
                s.skip_field("error")?;
            }
            ToolOutcome::Failure(msg) => {
                s.serialize_field("success", &false)?;
                s.serialize_field("result", "")?;
                s.serialize_field("error", msg)?;
            }
        }
        s.end()
    }
}

impl fmt::Display for ToolOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolOutcome::Success(text) => write!(f, "{}", text),
            ToolOutcome::Failure(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// Backend failures before a tool envelope was obtained
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolClientError {
    #[error("Tool call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Tool server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed tool response: {0}")]
    Decode(String),

    #[error("{0}")]
    Rejected(String),
}

/// Where tool calls are sent
#[derive(Debug)]
pub enum ToolBackend {
    Http(HttpToolBackend),
    Local(LocalToolBackend),
    Fake(FakeToolBackend),
}

impl ToolBackend {
    async fn send(&self, call: &ToolCall) -> Result<ToolResponse, ToolClientError> {
        match self {
            ToolBackend::Http(b) => b.send(call).await,
            ToolBackend::Local(b) => b.send(call).await,
            ToolBackend::Fake(b) => b.send(call).await,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ToolBackend::Http(_) => "http",
            ToolBackend::Local(_) => "local",
            ToolBackend::Fake(_) => "fake",
        }
    }
}

/// Default per-call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Single-attempt tool client with a fixed timeout
#[derive(Debug)]
pub struct ToolClient {
    backend: ToolBackend,
    timeout: Duration,
}

impl ToolClient {
    pub fn new(backend: ToolBackend, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn http(server_url: impl Into<String>, timeout: Duration) -> Self {
        Self::new(
            ToolBackend::Http(HttpToolBackend::new(server_url, timeout)),
            timeout,
        )
    }

    pub fn local(registry: ToolRegistry, timeout: Duration) -> Self {
        Self::new(ToolBackend::Local(LocalToolBackend::new(registry)), timeout)
    }

    pub fn fake(fake: FakeToolBackend, timeout: Duration) -> Self {
        Self::new(ToolBackend::Fake(fake), timeout)
    }

    /// Client for the configured tool mode
    pub fn from_config(tools: &ToolsConfig, search: &SearchConfig) -> Self {
        let timeout = Duration::from_secs(tools.timeout_seconds);
        match tools.mode {
            ToolMode::Http => Self::http(tools.server_url.clone(), timeout),
            ToolMode::Local => Self::local(ToolRegistry::new(search.clone()), timeout),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn backend(&self) -> &ToolBackend {
        &self.backend
    }

    /// Invoke a tool; never fails outward
    pub async fn invoke(&self, call: &ToolCall) -> ToolOutcome {
        debug!(tool = call.name(), backend = self.backend.kind(), input = call.input(), "tool call");

        let sent = tokio::time::timeout(self.timeout, self.backend.send(call)).await;
        let outcome = match sent {
            Ok(Ok(response)) => ToolOutcome::from(response),
            Ok(Err(e)) => ToolOutcome::Failure(e.to_string()),
            Err(_) => ToolOutcome::Failure(ToolClientError::Timeout(self.timeout).to_string()),
        };

        if let ToolOutcome::Failure(msg) = &outcome {
            debug!(tool = call.name(), error = %msg, "tool call failed");
        }
        outcome
    }

    pub async fn calculate(&self, expression: &str) -> ToolOutcome {
        self.invoke(&ToolCall::calculator(expression)).await
    }

    pub async fn web_search(&self, query: &str) -> ToolOutcome {
        self.invoke(&ToolCall::web_search(query)).await
    }
}
