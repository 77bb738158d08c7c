//! Logging setup and pipeline event rendering
//!
//! Logs go to stderr so stdout stays clean for reports and for the MCP
//! transport.

use guesstimate_core::{EventKind, EventReceiver, PipelineEvent};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber; `RUST_LOG` wins over `verbose`
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Drain `rx` into the log until every sender is dropped
pub async fn log_events(mut rx: EventReceiver) {
    while let Some(event) = rx.recv().await {
        log_event(&event);
    }
}

fn log_event(event: &PipelineEvent) {
    let line = describe_event(&event.kind);
    match &event.kind {
        EventKind::AnalysisFallback { .. } | EventKind::RunFailed { .. } => {
            warn!(run_id = %event.run_id, "{}", line)
        }
        EventKind::ToolResult { success: false, .. } => {
            warn!(run_id = %event.run_id, "{}", line)
        }
        _ => info!(run_id = %event.run_id, "{}", line),
    }
}

/// One-line rendering of an event
pub fn describe_event(kind: &EventKind) -> String {
    match kind {
        EventKind::RunStarted { problem } => format!("[RUN] started: {}", problem),
        EventKind::StageEntered { stage } => format!("[STAGE] {} started", stage),
        EventKind::StageCompleted { stage } => format!("[STAGE] {} completed", stage),
        EventKind::CompletionRequested { stage, provider } => {
            format!("[LLM] {} request to {}", stage, provider)
        }
        EventKind::AnalysisFallback { reason } => {
            format!("[ANALYZE] using fallback decomposition: {}", reason)
        }
        EventKind::ToolInvoked { stage, tool, input } => {
            format!("[TOOL] {} -> {}: {}", stage, tool, input)
        }
        EventKind::ToolResult {
            tool,
            success,
            detail,
            ..
        } => {
            let status = if *success { "SUCCESS" } else { "FAILED" };
            format!("[TOOL] {} {} - {}", tool, status, detail)
        }
        EventKind::RunCompleted { final_estimate } => {
            format!("[RUN] completed, final estimate: {}", final_estimate)
        }
        EventKind::RunFailed { error } => format!("[RUN] failed: {}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guesstimate_core::Stage;

    #[test]
    fn test_describe_tool_events() {
        let invoked = EventKind::ToolInvoked {
            stage: Stage::Research,
            tool: "web-search".to_string(),
            input: "NYC population".to_string(),
        };
        assert_eq!(
            describe_event(&invoked),
            "[TOOL] research -> web-search: NYC population"
        );

        let failed = EventKind::ToolResult {
            stage: Stage::Calculate,
            tool: "calculator".to_string(),
            success: false,
            detail: "Division by zero".to_string(),
        };
        assert_eq!(
            describe_event(&failed),
            "[TOOL] calculator FAILED - Division by zero"
        );
    }

    #[test]
    fn test_describe_stage_events() {
        let entered = EventKind::StageEntered {
            stage: Stage::Validate,
        };
        assert_eq!(describe_event(&entered), "[STAGE] validate started");
    }
}
