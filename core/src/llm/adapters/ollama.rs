//! Ollama Adapter
//!
//! Local Ollama chat API, non-streaming.

use crate::llm::adapters::transport::{HttpTransport, ReqwestTransport, Transport};
use crate::llm::adapters::{AdapterError, LlmAdapter};
use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// Ollama adapter (local HTTP API)
#[derive(Debug)]
pub struct OllamaAdapter {
    /// Base URL (e.g., http://127.0.0.1:11434)
    base_url: String,
    /// Model name (e.g., llama3)
    model: String,
    /// HTTP transport
    transport: Transport,
}

impl OllamaAdapter {
    /// Create new Ollama adapter
    pub fn new(base_url: String, model: String) -> Self {
        Self::with_transport(base_url, model, Transport::Real(ReqwestTransport::new()))
    }

    /// Create adapter with custom transport (for testing)
    pub fn with_transport(base_url: String, model: String, transport: Transport) -> Self {
        Self {
            base_url,
            model,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request(&self, prompt: &str) -> String {
        serde_json::json!({
            "model": self.model,
            "messages": [{"role": "system", "content": prompt}],
            "stream": false
        })
        .to_string()
    }

    fn extract_content(&self, response: &str) -> Result<String, AdapterError> {
        let json: JsonValue = serde_json::from_str(response)?;
        json["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AdapterError::InvalidResponse("Missing message.content".to_string()))
    }
}

#[async_trait]
impl LlmAdapter for OllamaAdapter {
    async fn complete(&self, prompt: &str) -> Result<String, AdapterError> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let body = self.build_request(prompt);
        let headers = [("Content-Type", "application/json")];

        let response = self.transport.post_json(&url, &headers, &body).await?;
        self.extract_content(&response)
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::adapters::transport::FakeTransport;

    #[tokio::test]
    async fn test_ollama_reads_message_content() {
        let fixture = r#"{"model":"llama3","message":{"role":"assistant","content":"hi"},"done":true}"#;
        let adapter = OllamaAdapter::with_transport(
            "http://127.0.0.1:11434".to_string(),
            "llama3".to_string(),
            Transport::Fake(FakeTransport::new(fixture)),
        );
        assert_eq!(adapter.complete("hello").await.unwrap(), "hi");
        assert_eq!(adapter.provider_name(), "ollama");
    }
}
