//! Stub Adapter
//!
//! Replays scripted replies without network calls. Used by tests and by
//! `provider = "stub"` for offline dry runs.

use crate::llm::adapters::{AdapterError, LlmAdapter};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Stub adapter (returns scripted responses)
#[derive(Debug, Default)]
pub struct StubAdapter {
    /// Replies handed out in order
    script: Mutex<VecDeque<String>>,
    /// Reply once the script runs dry
    fallback: String,
    /// When set, every call fails with a network error
    failure: Option<String>,
    /// Prompts received so far
    prompts: Mutex<Vec<String>>,
}

impl StubAdapter {
    /// Stub that always answers with the default reply
    pub fn new() -> Self {
        Self {
            fallback: Self::default_response(),
            ..Self::default()
        }
    }

    /// Stub that replays `replies` in order, then the default reply
    pub fn scripted<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(replies.into_iter().map(Into::into).collect()),
            fallback: Self::default_response(),
            ..Self::default()
        }
    }

    /// Stub whose every call fails as if the service were unreachable
    pub fn unreachable(msg: &str) -> Self {
        Self {
            failure: Some(msg.to_string()),
            ..Self::default()
        }
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    fn default_response() -> String {
        "Stub response: no language model configured.".to_string()
    }
}

#[async_trait]
impl LlmAdapter for StubAdapter {
    async fn complete(&self, prompt: &str) -> Result<String, AdapterError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Some(ref msg) = self.failure {
            return Err(AdapterError::Network(msg.clone()));
        }
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        Ok(next.unwrap_or_else(|| self.fallback.clone()))
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}
