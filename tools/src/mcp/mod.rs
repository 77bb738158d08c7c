//! MCP-style tool server
//!
//! JSON-RPC 2.0 over newline-delimited stdio, exposing the registry tools
//! plus in-memory notes as resources and a summarising prompt.

pub mod models;
pub mod server;
pub mod stdio;

pub use models::{McpError, McpMessage, McpRequest, McpResponse};
pub use server::McpServer;
pub use stdio::{serve, serve_stdio};
