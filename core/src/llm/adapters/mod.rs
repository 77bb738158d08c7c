pub mod factory;
pub mod ollama;
pub mod openai;
pub mod stub;
pub mod transport;
pub mod transport_fake;
pub mod transport_reqwest;
pub mod transport_types;

// Re-export common types
pub use factory::create_adapter;
pub use ollama::OllamaAdapter;
pub use openai::OpenAiAdapter;
pub use stub::StubAdapter;
pub use transport::Transport;
pub use transport_types::{AdapterError, HttpTransport};

use async_trait::async_trait;

/// Completion provider
///
/// Every stage reaches the model through this one call. Replies are
/// untrusted free text.
#[async_trait]
pub trait LlmAdapter: Send + Sync {
    /// Send `prompt` and return the full reply text
    async fn complete(&self, prompt: &str) -> Result<String, AdapterError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;
}

/// Concrete adapter over every supported provider
#[derive(Debug)]
pub enum Adapter {
    OpenAi(OpenAiAdapter),
    Ollama(OllamaAdapter),
    Stub(StubAdapter),
}

#[async_trait]
impl LlmAdapter for Adapter {
    async fn complete(&self, prompt: &str) -> Result<String, AdapterError> {
        match self {
            Adapter::OpenAi(a) => a.complete(prompt).await,
            Adapter::Ollama(a) => a.complete(prompt).await,
            Adapter::Stub(a) => a.complete(prompt).await,
        }
    }

    fn provider_name(&self) -> &str {
        match self {
            Adapter::OpenAi(a) => a.provider_name(),
            Adapter::Ollama(a) => a.provider_name(),
            Adapter::Stub(a) => a.provider_name(),
        }
    }
}

impl From<StubAdapter> for Adapter {
    fn from(stub: StubAdapter) -> Self {
        Adapter::Stub(stub)
    }
}
