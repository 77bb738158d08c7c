//! Tool request and response models
//!
//! Wire shapes shared by the HTTP server, the stdio server and the client.

use serde::{Deserialize, Serialize};

/// Calculator invocation body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculatorRequest {
    pub expression: String,
}

/// Web-search invocation body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebSearchRequest {
    pub query: String,
}

/// Normalized tool envelope
///
/// Failures carry an empty `result` and a populated `error`. A body
/// without a `success` field is read as successful.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResponse {
    #[serde(default)]
    pub result: String,
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_success() -> bool {
    true
}

impl ToolResponse {
    pub fn ok(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            result: String::new(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Tool listing entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

impl ToolDescriptor {
    /// Descriptor for a tool taking a single required string argument
    pub fn single_string_arg(name: &str, description: &str, arg: &str, arg_description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    arg: {"type": "string", "description": arg_description}
                },
                "required": [arg]
            }),
        }
    }
}
