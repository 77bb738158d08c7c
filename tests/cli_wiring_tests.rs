//! CLI wiring integration tests
//!
//! Tests end-to-end CLI behavior:
//! - Mode dispatch (solve, config, mcp)
//! - Exit codes
//! - Output formats
//!
//! All tests run the real binary via std::process::Command with an explicit
//! config file in a temp directory, the stub provider and local tools.

use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const CONFIG: &str = r#"
[llm]
provider = "stub"
api_key = "sk-secret"

[tools]
mode = "local"
timeout_seconds = 5
"#;

fn guesstimate_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_guesstimate"))
}

fn write_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, CONFIG).unwrap();
    path
}

fn command(config: &Path) -> Command {
    let mut cmd = Command::new(guesstimate_binary());
    cmd.arg("--config")
        .arg(config)
        .env_remove("GUESSTIMATE_CONFIG")
        .env_remove("OPENAI_API_KEY")
        .env_remove("OPENAI_BASE_URL")
        .env_remove("GUESSTIMATE_MODEL")
        .env_remove("GUESSTIMATE_SERVER_URL")
        .env_remove("TAVILY_API_KEY")
        .env("RUST_LOG", "warn");
    cmd
}

fn run(config: &Path, args: &[&str]) -> Output {
    command(config).args(args).output().unwrap()
}

#[test]
fn test_solve_prints_report() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    let output = run(&config, &["solve", "How", "many", "cats", "live", "in", "Paris?"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("GUESSTIMATE SOLUTION"));
    assert!(stdout.contains("Problem: How many cats live in Paris?"));
    assert!(stdout.contains("Analysis: Unknown estimation target"));
}

#[test]
fn test_solve_json_output() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    let output = run(&config, &["solve", "--json", "How many dogs?"]);
    assert_eq!(output.status.code(), Some(0));

    let state: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(state["problem"], "How many dogs?");
    assert!(state["final_answer"]
        .as_str()
        .unwrap()
        .contains("GUESSTIMATE SOLUTION"));
}

#[test]
fn test_blank_problem_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    let output = run(&config, &["solve", "   "]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_config_mode_masks_secrets() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    let output = run(&config, &["config"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("provider = \"stub\""));
    assert!(stdout.contains("api_key = \"***\""));
    assert!(!stdout.contains("sk-secret"));
}

#[test]
fn test_missing_config_file_exit_code() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let output = run(&missing, &["config"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_mcp_mode_answers_on_stdout() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    let mut child = command(&config)
        .arg("mcp")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    {
        let stdin = child.stdin.as_mut().unwrap();
        writeln!(
            stdin,
            r#"{{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{{"name":"calculator","arguments":{{"expression":"6 * 7"}}}}}}"#
        )
        .unwrap();
    }
    drop(child.stdin.take());

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let reply: Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(reply["id"], 1);
    assert_eq!(reply["result"]["content"][0]["text"], "6 * 7 = 42");
}
