//! MCP request handling
//!
//! Serves the calculator and web search from the [`ToolRegistry`] plus an
//! `add-note` tool whose notes are exposed as `note://internal/<name>`
//! resources and summarised by the `summarize-notes` prompt.

use super::models::*;
use crate::models::ToolDescriptor;
use crate::registry::{required_str, ToolError, ToolRegistry, CALCULATOR};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub const ADD_NOTE: &str = "add-note";
pub const SUMMARIZE_NOTES: &str = "summarize-notes";
pub const SERVER_NAME: &str = "guesstimate";

const NOTE_SCHEME: &str = "note://";
const NOTE_PREFIX: &str = "note://internal/";
const RESOURCES_CHANGED: &str = "notifications/resources/list_changed";

/// Stateful MCP server for one stdio session
#[derive(Debug)]
pub struct McpServer {
    registry: ToolRegistry,
    notes: RwLock<BTreeMap<String, String>>,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            notes: RwLock::new(BTreeMap::new()),
        }
    }

    /// Handle one raw line; a parse failure is answered with id `null`
    pub async fn handle_line(&self, line: &str) -> Vec<McpMessage> {
        match serde_json::from_str::<McpRequest>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!(error = %e, "unparseable MCP message");
                vec![McpMessage::Response(McpResponse::failure(
                    Value::Null,
                    McpError::parse_error(format!("Parse error: {}", e)),
                ))]
            }
        }
    }

    /// Dispatch one request; notifications produce no response
    pub async fn handle(&self, request: McpRequest) -> Vec<McpMessage> {
        debug!(method = %request.method, id = ?request.id, "MCP request");

        if request.jsonrpc != JSONRPC_VERSION {
            return match request.id {
                Some(id) => vec![McpMessage::Response(McpResponse::failure(
                    id,
                    McpError::invalid_request("jsonrpc must be \"2.0\""),
                ))],
                None => Vec::new(),
            };
        }

        let mut outgoing = Vec::new();
        let params = request.params.unwrap_or(Value::Null);
        let result = match request.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.tool_descriptors() })),
            "tools/call" => self.call_tool(&params, &mut outgoing).await,
            "resources/list" => to_value(json!({ "resources": self.list_resources().await })),
            "resources/read" => self.read_resource(&params).await,
            "prompts/list" => Ok(json!({ "prompts": [summarize_prompt()] })),
            "prompts/get" => self.get_prompt(&params).await,
            method if method.starts_with("notifications/") => {
                return Vec::new();
            }
            method => Err(McpError::method_not_found(format!(
                "Method not found: {}",
                method
            ))),
        };

        if let Some(id) = request.id {
            let response = match result {
                Ok(value) => McpResponse::success(id, value),
                Err(error) => McpResponse::failure(id, error),
            };
            outgoing.insert(0, McpMessage::Response(response));
        }
        outgoing
    }

    fn initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": true },
                "prompts": { "listChanged": false },
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
        })
    }

    fn tool_descriptors(&self) -> Vec<ToolDescriptor> {
        let mut tools = vec![ToolDescriptor {
            name: ADD_NOTE.to_string(),
            description: "Add a new note".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "content": { "type": "string" },
                },
                "required": ["name", "content"],
            }),
        }];
        tools.extend(self.registry.descriptors());
        tools
    }

    async fn call_tool(
        &self,
        params: &Value,
        outgoing: &mut Vec<McpMessage>,
    ) -> Result<Value, McpError> {
        let call: ToolCallParams = serde_json::from_value(params.clone())
            .map_err(|e| McpError::invalid_params(format!("Invalid tools/call params: {}", e)))?;
        let arguments = call
            .arguments
            .filter(|a| a.as_object().is_some_and(|o| !o.is_empty()))
            .ok_or_else(|| McpError::invalid_params("Missing arguments"))?;

        let result = if call.name == ADD_NOTE {
            let name = required_str(ADD_NOTE, &arguments, "name").map_err(tool_error)?;
            let content = required_str(ADD_NOTE, &arguments, "content").map_err(tool_error)?;
            self.notes
                .write()
                .await
                .insert(name.to_string(), content.to_string());
            info!(note = name, "note added");
            outgoing.push(McpMessage::Notification(McpRequest::notification(
                RESOURCES_CHANGED,
                None,
            )));
            ToolCallResult::text(format!("Added note '{}' with content: {}", name, content))
        } else {
            let response = self
                .registry
                .call(&call.name, &arguments)
                .await
                .map_err(tool_error)?;
            match response.error {
                None => ToolCallResult::text(response.result),
                Some(error) if call.name == CALCULATOR => {
                    let expression = arguments
                        .get("expression")
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    ToolCallResult::error_text(format!(
                        "Error calculating '{}': {}",
                        expression, error
                    ))
                }
                Some(error) => ToolCallResult::error_text(error),
            }
        };

        to_value(result)
    }

    async fn list_resources(&self) -> Vec<Resource> {
        self.notes
            .read()
            .await
            .keys()
            .map(|name| Resource {
                uri: format!("{}{}", NOTE_PREFIX, name),
                name: format!("Note: {}", name),
                description: format!("A simple note named {}", name),
                mime_type: "text/plain".to_string(),
            })
            .collect()
    }

    async fn read_resource(&self, params: &Value) -> Result<Value, McpError> {
        let uri = params
            .get("uri")
            .and_then(Value::as_str)
            .ok_or_else(|| McpError::invalid_params("Missing uri"))?;
        let name = note_name(uri)?;
        let notes = self.notes.read().await;
        let text = notes
            .get(name)
            .ok_or_else(|| McpError::invalid_params(format!("Note not found: {}", name)))?;

        to_value(json!({
            "contents": [ResourceContents {
                uri: uri.to_string(),
                mime_type: "text/plain".to_string(),
                text: text.clone(),
            }]
        }))
    }

    async fn get_prompt(&self, params: &Value) -> Result<Value, McpError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| McpError::invalid_params("Missing prompt name"))?;
        if name != SUMMARIZE_NOTES {
            return Err(McpError::invalid_params(format!("Unknown prompt: {}", name)));
        }

        let style = params
            .pointer("/arguments/style")
            .and_then(Value::as_str)
            .unwrap_or("brief");
        let detail = if style == "detailed" {
            " Give extensive details."
        } else {
            ""
        };

        let notes = self.notes.read().await;
        let listing: Vec<String> = notes
            .iter()
            .map(|(name, content)| format!("- {}: {}", name, content))
            .collect();

        to_value(PromptResult {
            description: "Summarize the current notes".to_string(),
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: ToolContent::Text {
                    text: format!(
                        "Here are the current notes to summarize:{}\n\n{}",
                        detail,
                        listing.join("\n")
                    ),
                },
            }],
        })
    }
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new(ToolRegistry::default())
    }
}

fn summarize_prompt() -> Prompt {
    Prompt {
        name: SUMMARIZE_NOTES.to_string(),
        description: "Creates a summary of all notes".to_string(),
        arguments: vec![PromptArgument {
            name: "style".to_string(),
            description: "Style of the summary (brief/detailed)".to_string(),
            required: false,
        }],
    }
}

// The host part of a note URI is ignored; the path names the note.
fn note_name(uri: &str) -> Result<&str, McpError> {
    let rest = uri.strip_prefix(NOTE_SCHEME).ok_or_else(|| {
        let scheme = uri.split("://").next().unwrap_or(uri);
        McpError::invalid_params(format!("Unsupported URI scheme: {}", scheme))
    })?;
    match rest.split_once('/') {
        Some((_, name)) if !name.is_empty() => Ok(name.trim_start_matches('/')),
        _ => Err(McpError::invalid_params(format!("Note not found: {}", uri))),
    }
}

fn tool_error(error: ToolError) -> McpError {
    McpError::invalid_params(error.to_string())
}

fn to_value<T: Serialize>(value: T) -> Result<Value, McpError> {
    serde_json::to_value(value).map_err(|e| McpError::internal_error(e.to_string()))
}
