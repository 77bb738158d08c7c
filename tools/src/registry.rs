//! Tool registry
//!
//! Dispatches named invocations to the calculator and web search and wraps
//! their outcome in a [`ToolResponse`].

use crate::calculator;
use crate::models::{ToolDescriptor, ToolResponse};
use crate::search::{SearchConfig, WebSearch};
use serde_json::Value;
use tracing::debug;

pub const CALCULATOR: &str = "calculator";
pub const WEB_SEARCH: &str = "web-search";

/// Invocation errors that never reach the tool itself
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing {argument} for tool {tool}")]
    MissingArgument { tool: String, argument: String },
}

/// Registry of the tools this process serves
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    search: WebSearch,
}

impl ToolRegistry {
    pub fn new(search: SearchConfig) -> Self {
        Self {
            search: WebSearch::new(search),
        }
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![CALCULATOR, WEB_SEARCH]
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::single_string_arg(
                CALCULATOR,
                "Perform arithmetic calculations including square root and modulo",
                "expression",
                "Mathematical expression to evaluate (e.g., '2 + 3 * 4', 'sqrt(16)', '10 % 3')",
            ),
            ToolDescriptor::single_string_arg(
                WEB_SEARCH,
                "Search the web for real-time information using Tavily",
                "query",
                "Search query for web search",
            ),
        ]
    }

    /// Evaluate `expression`; success text reads `<expression> = <value>`
    pub fn calculator(&self, expression: &str) -> ToolResponse {
        match calculator::evaluate(expression) {
            Ok(value) => ToolResponse::ok(format!("{} = {}", expression, value)),
            Err(e) => {
                debug!(expression, error = %e, "calculator rejected expression");
                ToolResponse::failed(e.to_string())
            }
        }
    }

    pub async fn web_search(&self, query: &str) -> ToolResponse {
        ToolResponse::ok(self.search.search(query).await)
    }

    /// Invoke a tool by name with a JSON arguments object
    pub async fn call(&self, name: &str, arguments: &Value) -> Result<ToolResponse, ToolError> {
        match name {
            CALCULATOR => {
                let expression = required_str(name, arguments, "expression")?;
                Ok(self.calculator(expression))
            }
            WEB_SEARCH => {
                let query = required_str(name, arguments, "query")?;
                Ok(self.web_search(query).await)
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

/// Non-empty string argument `key`
pub fn required_str<'a>(tool: &str, arguments: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::MissingArgument {
            tool: tool.to_string(),
            argument: key.to_string(),
        })
}
