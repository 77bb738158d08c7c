//! Stage 2: web lookups for the first research needs
//!
//! Lookups run concurrently; results are merged in need order. A failed
//! lookup is stored as [`Finding::Failed`] and never touches its siblings.

use super::{Stage, StageContext};
use crate::state::{Finding, Research, RunState, MAX_RESEARCH_LOOKUPS};
use crate::tool_client::{ToolCall, ToolOutcome};
use futures::future::join_all;
use tracing::debug;

pub async fn run(state: RunState, ctx: &StageContext<'_>) -> RunState {
    let needs: Vec<String> = state
        .analysis()
        .map(|a| {
            a.research_needs
                .iter()
                .take(MAX_RESEARCH_LOOKUPS)
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    debug!(lookups = needs.len(), "researching");

    let outcomes = join_all(
        needs
            .iter()
            .map(|need| ctx.invoke_tool(Stage::Research, ToolCall::web_search(need.as_str()))),
    )
    .await;

    let mut research = Research::new();
    for (need, outcome) in needs.into_iter().zip(outcomes) {
        let finding = match outcome {
            ToolOutcome::Success(text) => Finding::Found(text),
            ToolOutcome::Failure(msg) => Finding::Failed(msg),
        };
        research.insert(need, finding);
    }

    state.with_research(research)
}
