//! Guesstimate binary
//!
//! Usage:
//!   guesstimate                      interactive menu
//!   guesstimate solve <problem...>   one problem, report on stdout
//!   guesstimate serve                HTTP tool server
//!   guesstimate mcp                  MCP server on stdin/stdout
//!   guesstimate config               effective configuration

use clap::Parser;
use guesstimate::cli::{init_logging, run_cli_mode, Args};

#[tokio::main]
async fn main() {
    // A missing .env is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_logging(args.verbose);

    let code = run_cli_mode(args).await;
    std::process::exit(code);
}
