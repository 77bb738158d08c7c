//! Estimation pipeline
//!
//! Five stages run in a fixed order, each taking the [`RunState`] by value
//! and handing back the grown state:
//!
//! ```text
//! analyze -> research -> calculate -> validate -> finalize -> done
//! ```
//!
//! There are no branches, retries or early exits. Recoverable failures are
//! recorded inside the state; only a failed completion request aborts.

pub mod analyze;
pub mod calculate;
pub mod events;
pub mod finalize;
pub mod prompts;
pub mod research;
pub mod validate;

pub use events::{EventKind, EventReceiver, EventSender, EventSink, PipelineEvent};

use crate::error::SolveError;
use crate::llm::{Adapter, LlmAdapter};
use crate::state::RunState;
use crate::tool_client::{ToolCall, ToolClient, ToolOutcome};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Analyze,
    Research,
    Calculate,
    Validate,
    Finalize,
}

impl Stage {
    /// Execution order
    pub const ALL: [Stage; 5] = [
        Stage::Analyze,
        Stage::Research,
        Stage::Calculate,
        Stage::Validate,
        Stage::Finalize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Analyze => "analyze",
            Stage::Research => "research",
            Stage::Calculate => "calculate",
            Stage::Validate => "validate",
            Stage::Finalize => "finalize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collaborators a stage may use
pub struct StageContext<'a> {
    pub llm: &'a Adapter,
    pub tools: &'a ToolClient,
    pub events: &'a EventSink,
}

impl StageContext<'_> {
    /// Completion request; failure aborts the run
    pub async fn complete(&self, stage: Stage, prompt: &str) -> Result<String, SolveError> {
        self.events.emit(EventKind::CompletionRequested {
            stage,
            provider: self.llm.provider_name().to_string(),
        });
        debug!(%stage, prompt_len = prompt.len(), "completion request");
        self.llm
            .complete(prompt)
            .await
            .map_err(|source| SolveError::Completion { stage, source })
    }

    /// Tool invocation with progress events; never fails outward
    pub async fn invoke_tool(&self, stage: Stage, call: ToolCall) -> ToolOutcome {
        self.events.emit(EventKind::ToolInvoked {
            stage,
            tool: call.name().to_string(),
            input: call.input().to_string(),
        });
        let outcome = self.tools.invoke(&call).await;
        self.events.emit(EventKind::ToolResult {
            stage,
            tool: call.name().to_string(),
            success: outcome.is_success(),
            detail: match &outcome {
                ToolOutcome::Success(text) => text.clone(),
                ToolOutcome::Failure(msg) => msg.clone(),
            },
        });
        outcome
    }
}

/// The fixed five-stage state machine
#[derive(Debug, Default, Clone, Copy)]
pub struct Pipeline;

impl Pipeline {
    pub fn new() -> Self {
        Pipeline
    }

    /// Drive `state` through every stage
    pub async fn run(
        &self,
        mut state: RunState,
        ctx: &StageContext<'_>,
    ) -> Result<RunState, SolveError> {
        ctx.events.emit(EventKind::RunStarted {
            problem: state.problem().to_string(),
        });

        for stage in Stage::ALL {
            ctx.events.emit(EventKind::StageEntered { stage });
            debug!(run_id = %state.run_id(), %stage, "stage started");

            state = match stage {
                Stage::Analyze => analyze::run(state, ctx).await,
                Stage::Research => Ok(research::run(state, ctx).await),
                Stage::Calculate => calculate::run(state, ctx).await,
                Stage::Validate => validate::run(state, ctx).await,
                Stage::Finalize => Ok(finalize::run(state)),
            }
            .map_err(|e| {
                ctx.events.emit(EventKind::RunFailed {
                    error: e.to_string(),
                });
                e
            })?;

            ctx.events.emit(EventKind::StageCompleted { stage });
            debug!(run_id = %state.run_id(), %stage, "stage completed");
        }

        let final_estimate = state
            .final_estimate()
            .map(|e| e.to_string())
            .unwrap_or_default();
        ctx.events.emit(EventKind::RunCompleted { final_estimate });
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let names: Vec<&str> = Stage::ALL.iter().map(Stage::as_str).collect();
        assert_eq!(
            names,
            vec!["analyze", "research", "calculate", "validate", "finalize"]
        );
    }
}
