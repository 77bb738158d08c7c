//! CLI argument parsing

use clap::{Parser, Subcommand};
use guesstimate_core::{GuesstimateConfig, LlmProvider, ToolMode};
use std::path::PathBuf;

/// Fermi-style estimation from the command line
#[derive(Debug, Parser)]
#[command(name = "guesstimate")]
#[command(about = "Guesstimate - step-by-step estimates for open-ended quantities", long_about = None)]
#[command(version)]
pub struct Args {
    /// Config file (overrides $GUESSTIMATE_CONFIG and the default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Completion provider: openai, ollama or stub
    #[arg(long, global = true)]
    pub provider: Option<LlmProvider>,

    /// Model name passed to the completion provider
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Where tool calls go: http (tool server) or local (in-process)
    #[arg(long, global = true)]
    pub tools: Option<ToolMode>,

    /// Base URL of the tool server
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand (if not provided, starts the interactive menu)
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Solve one problem and print the report
    Solve {
        /// The problem; several words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        problem: Vec<String>,

        /// Print the whole run state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Menu of example problems and custom input
    Interactive,

    /// Run the HTTP tool server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Serve tools, resources and prompts over MCP on stdin/stdout
    Mcp,

    /// Print the effective configuration with secrets masked
    Config,
}

impl Args {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Interactive)
    }

    /// Flags win over file and environment settings
    pub fn apply_to(&self, config: &mut GuesstimateConfig) {
        if let Some(provider) = self.provider {
            config.llm.provider = provider;
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(mode) = self.tools {
            config.tools.mode = mode;
        }
        if let Some(url) = &self.server_url {
            config.tools.server_url = url.clone();
        }
        if let Some(Command::Serve { host, port }) = &self.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }
    }
}

/// Problem text of a `solve` invocation
pub fn joined_problem(words: &[String]) -> String {
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_no_subcommand_is_interactive() {
        let args = parse(&["guesstimate"]);
        assert!(args.command.is_none());
        assert_eq!(args.command(), Command::Interactive);
        assert!(!args.verbose);
    }

    #[test]
    fn test_solve_joins_words() {
        let args = parse(&["guesstimate", "solve", "How", "many", "cats?", "--json"]);
        match args.command() {
            Command::Solve { problem, json } => {
                assert_eq!(joined_problem(&problem), "How many cats?");
                assert!(json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_solve_requires_problem() {
        assert!(Args::try_parse_from(["guesstimate", "solve"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&[
            "guesstimate",
            "solve",
            "x",
            "--tools",
            "local",
            "--provider",
            "stub",
            "-v",
        ]);
        assert_eq!(args.tools, Some(ToolMode::Local));
        assert_eq!(args.provider, Some(LlmProvider::Stub));
        assert!(args.verbose);
    }

    #[test]
    fn test_unknown_tool_mode_rejected() {
        assert!(Args::try_parse_from(["guesstimate", "--tools", "carrier-pigeon"]).is_err());
    }

    #[test]
    fn test_apply_to_overrides_config() {
        let args = parse(&[
            "guesstimate",
            "--model",
            "gpt-4o-mini",
            "--server-url",
            "http://tools:9000",
            "serve",
            "--port",
            "9100",
        ]);
        let mut config = GuesstimateConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.tools.server_url, "http://tools:9000");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
