//! CLI module
//!
//! Provides:
//! - Argument parsing (`solve`, `interactive`, `serve`, `mcp`, `config`)
//! - Mode dispatch
//! - Logging setup and rendering of pipeline events
//! - The interactive menu

pub mod args;
pub mod dispatch;
pub mod interactive;
pub mod logging;

// Re-exports
pub use args::{Args, Command};
pub use dispatch::{exit_code_for, run_cli_mode};
pub use interactive::{run_menu, EXAMPLE_PROBLEMS};
pub use logging::{describe_event, init_logging, log_events};

use guesstimate_core::config::ConfigError;
use guesstimate_core::llm::AdapterError;
use guesstimate_core::SolveError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0:#}")]
    Config(anyhow::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("LLM setup failed: {0}")]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error("Server error: {0:#}")]
    Server(anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Exit codes (deterministic)
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, Error>;
