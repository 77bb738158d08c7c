//! OpenAI Adapter
//!
//! OpenAI-compatible chat completions API.

use crate::llm::adapters::transport::{HttpTransport, ReqwestTransport, Transport};
use crate::llm::adapters::{AdapterError, LlmAdapter};
use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// OpenAI-compatible adapter
#[derive(Debug)]
pub struct OpenAiAdapter {
    /// Base URL (e.g., https://api.openai.com/v1)
    base_url: String,
    /// Model name (e.g., gpt-3.5-turbo)
    model: String,
    /// API key
    api_key: String,
    /// Sampling temperature, provider default when unset
    temperature: Option<f64>,
    /// HTTP transport
    transport: Transport,
}

impl OpenAiAdapter {
    /// Create new OpenAI adapter
    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        Self::with_transport(
            base_url,
            model,
            api_key,
            Transport::Real(ReqwestTransport::new()),
        )
    }

    /// Create adapter with custom transport (for testing)
    pub fn with_transport(
        base_url: String,
        model: String,
        api_key: String,
        transport: Transport,
    ) -> Self {
        Self {
            base_url,
            model,
            api_key,
            temperature: None,
            transport,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Build chat request body
    ///
    /// The whole prompt travels as one system message.
    pub fn build_request(&self, prompt: &str) -> String {
        let mut request = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "system", "content": prompt}],
            "stream": false
        });
        if let Some(t) = self.temperature {
            request["temperature"] = serde_json::json!(t);
        }
        request.to_string()
    }

    /// Extract content from JSON response
    fn extract_content(&self, response: &str) -> Result<String, AdapterError> {
        let json: JsonValue = serde_json::from_str(response)?;

        let content = json["choices"]
            .get(0)
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                AdapterError::InvalidResponse("Missing choices[0].message.content".to_string())
            })?;

        Ok(content.to_string())
    }
}

#[async_trait]
impl LlmAdapter for OpenAiAdapter {
    async fn complete(&self, prompt: &str) -> Result<String, AdapterError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = self.build_request(prompt);

        let auth_header = format!("Bearer {}", self.api_key);
        let headers = [
            ("Authorization", auth_header.as_str()),
            ("Content-Type", "application/json"),
        ];

        let response = self.transport.post_json(&url, &headers, &body).await?;
        self.extract_content(&response)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::adapters::transport::FakeTransport;

    fn adapter(transport: FakeTransport) -> OpenAiAdapter {
        OpenAiAdapter::with_transport(
            "https://api.openai.com/v1/".to_string(),
            "gpt-3.5-turbo".to_string(),
            "sk-test".to_string(),
            Transport::Fake(transport),
        )
    }

    #[tokio::test]
    async fn test_complete_reads_first_choice() {
        let fixture = r#"{"choices":[{"message":{"role":"assistant","content":"42 tuners"}}]}"#;
        let adapter = adapter(FakeTransport::new(fixture));
        assert_eq!(adapter.complete("how many?").await.unwrap(), "42 tuners");
    }

    #[tokio::test]
    async fn test_request_carries_prompt_as_system_message() {
        let fixture = r#"{"choices":[{"message":{"content":"ok"}}]}"#;
        let adapter = adapter(FakeTransport::new(fixture)).with_temperature(0.2);
        adapter.complete("Analyze this").await.unwrap();

        let Transport::Fake(fake) = adapter.transport() else {
            panic!("expected fake transport");
        };
        let body: JsonValue = serde_json::from_str(&fake.requests()[0]).unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "Analyze this");
        assert_eq!(body["temperature"], 0.2);
    }

    #[tokio::test]
    async fn test_missing_content_is_invalid_response() {
        let adapter = adapter(FakeTransport::new(r#"{"choices":[]}"#));
        let err = adapter.complete("x").await.unwrap_err();
        assert!(matches!(err, AdapterError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_network_error_propagates() {
        let adapter = adapter(FakeTransport::with_error("connection refused"));
        let err = adapter.complete("x").await.unwrap_err();
        assert!(matches!(err, AdapterError::Network(_)));
    }
}
