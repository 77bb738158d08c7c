//! In-process tool backend over the tool registry

use super::{ToolCall, ToolClientError};
use guesstimate_tools::{ToolRegistry, ToolResponse};

#[derive(Debug, Clone)]
pub struct LocalToolBackend {
    registry: ToolRegistry,
}

impl LocalToolBackend {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub(super) async fn send(&self, call: &ToolCall) -> Result<ToolResponse, ToolClientError> {
        self.registry
            .call(call.name(), &call.arguments())
            .await
            .map_err(|e| ToolClientError::Rejected(e.to_string()))
    }
}
