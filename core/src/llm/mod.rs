//! LLM completion layer
//!
//! The pipeline treats the model as an opaque `complete(prompt) -> text`
//! function. Providers sit behind [`adapters::LlmAdapter`].

pub mod adapters;

pub use adapters::{
    create_adapter, Adapter, AdapterError, LlmAdapter, OllamaAdapter, OpenAiAdapter, StubAdapter,
};
