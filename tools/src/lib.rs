//! Guesstimate Tools
//!
//! The tool-serving side of the estimator: a safe arithmetic evaluator, a
//! web-search action, the registry that wraps both in the normalized
//! `{success, result, error}` envelope, and an MCP-style stdio server.

pub mod calculator;
pub mod mcp;
pub mod models;
pub mod registry;
pub mod search;

pub use calculator::{evaluate, CalcError};
pub use mcp::McpServer;
pub use models::{CalculatorRequest, ToolDescriptor, ToolResponse, WebSearchRequest};
pub use registry::{ToolError, ToolRegistry, CALCULATOR, WEB_SEARCH};
pub use search::{SearchConfig, WebSearch};
