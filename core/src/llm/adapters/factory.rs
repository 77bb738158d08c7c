//! Adapter Factory
//!
//! Creates LLM adapter instances from the `[llm]` configuration section.

use crate::config::{LlmConfig, LlmProvider};
use crate::llm::adapters::ollama::OllamaAdapter;
use crate::llm::adapters::openai::OpenAiAdapter;
use crate::llm::adapters::stub::StubAdapter;
use crate::llm::adapters::transport::{ReqwestTransport, Transport};
use crate::llm::adapters::{Adapter, AdapterError};
use tracing::debug;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const OLLAMA_BASE_URL: &str = "http://127.0.0.1:11434";

/// Create adapter from config
///
/// `openai` requires an API key; `ollama` and `stub` do not.
pub fn create_adapter(config: &LlmConfig) -> Result<Adapter, AdapterError> {
    let transport = || Transport::Real(ReqwestTransport::with_timeout(config.timeout_seconds));

    let adapter = match config.provider {
        LlmProvider::Stub => Adapter::Stub(StubAdapter::new()),
        LlmProvider::Ollama => {
            let base_url = config
                .base_url
                .clone()
                .unwrap_or_else(|| OLLAMA_BASE_URL.to_string());
            Adapter::Ollama(OllamaAdapter::with_transport(
                base_url,
                config.model.clone(),
                transport(),
            ))
        }
        LlmProvider::OpenAi => {
            let api_key = config
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| {
                    AdapterError::Configuration(
                        "OpenAI provider requires an API key (set OPENAI_API_KEY)".to_string(),
                    )
                })?;
            let base_url = config
                .base_url
                .clone()
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string());
            Adapter::OpenAi(
                OpenAiAdapter::with_transport(base_url, config.model.clone(), api_key, transport())
                    .with_temperature(f64::from(config.temperature)),
            )
        }
    };

    debug!(provider = %config.provider, model = %config.model, "created LLM adapter");
    Ok(adapter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::adapters::LlmAdapter;

    #[test]
    fn test_openai_requires_key() {
        let config = LlmConfig::default();
        let err = create_adapter(&config).unwrap_err();
        assert!(matches!(err, AdapterError::Configuration(_)));
    }

    #[test]
    fn test_openai_defaults_base_url() {
        let config = LlmConfig {
            api_key: Some("sk-test".to_string()),
            ..LlmConfig::default()
        };
        match create_adapter(&config).unwrap() {
            Adapter::OpenAi(a) => {
                assert_eq!(a.base_url(), OPENAI_BASE_URL);
                assert_eq!(a.model(), "gpt-3.5-turbo");
                assert!(a.build_request("p").contains("\"temperature\""));
            }
            other => panic!("expected OpenAI adapter, got {:?}", other),
        }
    }

    #[test]
    fn test_ollama_without_key() {
        let config = LlmConfig {
            provider: LlmProvider::Ollama,
            model: "llama3".to_string(),
            ..LlmConfig::default()
        };
        let adapter = create_adapter(&config).unwrap();
        assert_eq!(adapter.provider_name(), "ollama");
        match adapter {
            Adapter::Ollama(a) => assert_eq!(a.base_url(), OLLAMA_BASE_URL),
            other => panic!("expected Ollama adapter, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stub_provider() {
        let config = LlmConfig {
            provider: LlmProvider::Stub,
            ..LlmConfig::default()
        };
        let adapter = create_adapter(&config).unwrap();
        assert_eq!(adapter.provider_name(), "stub");
        assert!(adapter.complete("anything").await.is_ok());
    }
}
