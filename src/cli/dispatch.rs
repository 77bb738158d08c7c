//! CLI mode dispatch
//!
//! Dispatches to the mode handlers:
//! - solve: one problem, report (or run state JSON) on stdout
//! - interactive: example/custom problem menu
//! - serve: HTTP tool server
//! - mcp: MCP server on stdin/stdout
//! - config: effective configuration, secrets masked

use crate::cli::args::joined_problem;
use crate::cli::interactive::run_menu;
use crate::cli::logging::log_events;
use crate::cli::{
    Args, Command, Error, Result, EXIT_CONFIG_ERROR, EXIT_FAILURE, EXIT_SUCCESS,
};
use guesstimate_api::{ApiConfig, ApiServer};
use guesstimate_core::pipeline::events;
use guesstimate_core::{GuesstimateConfig, Solver};
use guesstimate_tools::{McpServer, ToolRegistry};
use tokio::io::BufReader;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Exit code wrapper for CLI operations
pub type ExitCode = i32;

/// Run the selected mode and return the process exit code
pub async fn run_cli_mode(args: Args) -> ExitCode {
    match run(args).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_code_for(&e)
        }
    }
}

pub fn exit_code_for(error: &Error) -> ExitCode {
    match error {
        Error::Config(_) | Error::InvalidConfig(_) | Error::Adapter(_) => EXIT_CONFIG_ERROR,
        _ => EXIT_FAILURE,
    }
}

/// Resolve configuration: file and environment, then flags, then validation
pub fn resolve_config(args: &Args) -> Result<GuesstimateConfig> {
    let mut config = GuesstimateConfig::load(args.config.as_deref()).map_err(Error::Config)?;
    args.apply_to(&mut config);
    config.validate()?;
    debug!(config = ?config.redacted(), "configuration resolved");
    Ok(config)
}

async fn run(args: Args) -> Result<()> {
    let config = resolve_config(&args)?;

    match args.command() {
        Command::Solve { problem, json } => solve(&config, &joined_problem(&problem), json).await,
        Command::Interactive => interactive(&config).await,
        Command::Serve { .. } => serve(&config).await,
        Command::Mcp => mcp(&config).await,
        Command::Config => {
            print!("{}", toml::to_string_pretty(&config.redacted())?);
            Ok(())
        }
    }
}

// The returned handle finishes once the solver (the last sender) is dropped.
fn build_solver(config: &GuesstimateConfig) -> Result<(Solver, JoinHandle<()>)> {
    let (tx, rx) = events::channel();
    let solver = Solver::from_config(config)?.with_events(tx);
    info!(
        provider = solver.provider_name(),
        tools = %config.tools.mode,
        "solver ready"
    );
    Ok((solver, tokio::spawn(log_events(rx))))
}

async fn solve(config: &GuesstimateConfig, problem: &str, json: bool) -> Result<()> {
    let (solver, logger) = build_solver(config)?;
    let outcome = solver.run(problem).await;
    drop(solver);
    let _ = logger.await;

    let state = outcome?;
    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!("{}", state.final_answer().unwrap_or_default());
    }
    Ok(())
}

async fn interactive(config: &GuesstimateConfig) -> Result<()> {
    let (solver, logger) = build_solver(config)?;
    let outcome = run_menu(
        &solver,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await;
    drop(solver);
    let _ = logger.await;
    outcome
}

async fn serve(config: &GuesstimateConfig) -> Result<()> {
    let api_config = ApiConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let server = ApiServer::new(api_config, ToolRegistry::new(config.search.clone()));
    server.start().await.map_err(Error::Server)
}

async fn mcp(config: &GuesstimateConfig) -> Result<()> {
    let server = McpServer::new(ToolRegistry::new(config.search.clone()));
    guesstimate_tools::mcp::serve_stdio(server)
        .await
        .map_err(Error::Server)
}
