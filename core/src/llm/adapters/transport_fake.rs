//! Fake transport for testing
//!
//! Uses fixture strings instead of real HTTP calls.

use crate::llm::adapters::transport_types::{AdapterError, HttpTransport};
use async_trait::async_trait;
use std::sync::Mutex;

/// Fake transport for testing (uses fixture strings)
#[derive(Debug)]
pub struct FakeTransport {
    /// Response body to return
    pub response_body: String,
    /// Error message to return (if set)
    pub error_message: Option<String>,
    /// Request bodies seen so far
    requests: Mutex<Vec<String>>,
}

impl FakeTransport {
    /// Create fake transport with given response
    pub fn new(response: &str) -> Self {
        Self {
            response_body: response.to_string(),
            error_message: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create fake transport that returns a network error
    pub fn with_error(msg: &str) -> Self {
        Self {
            response_body: String::new(),
            error_message: Some(msg.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Bodies posted through this transport, oldest first
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn post_json(
        &self,
        _url: &str,
        _headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, AdapterError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(body.to_string());
        }
        if let Some(ref msg) = self.error_message {
            return Err(AdapterError::Network(msg.clone()));
        }
        Ok(self.response_body.clone())
    }
}
