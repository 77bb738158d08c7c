//! Stage 3: turn a calculation narrative into calculator calls
//!
//! Every reply line carrying an arithmetic marker goes through the
//! extractor; each extracted expression is evaluated by the calculator tool
//! in line order. Failures are logged per line and never stop the loop.

use super::{prompts, Stage, StageContext};
use crate::error::SolveError;
use crate::extraction;
use crate::state::{Analysis, Calculation, RunState};
use crate::tool_client::{ToolCall, ToolOutcome};
use tracing::debug;

pub async fn run(state: RunState, ctx: &StageContext<'_>) -> Result<RunState, SolveError> {
    let analysis = state.analysis().cloned().unwrap_or_else(Analysis::fallback);
    let research = state.research().cloned().unwrap_or_default();

    let reply = ctx
        .complete(Stage::Calculate, &prompts::calculation_prompt(&analysis, &research))
        .await?;

    let mut calculations = Vec::new();
    for line in reply.lines() {
        if !extraction::has_arithmetic_marker(line) {
            continue;
        }
        let Some(expression) = extraction::extract(line) else {
            debug!(line, "no expression in line");
            continue;
        };
        calculations.push(evaluate(ctx, line, expression).await);
    }

    Ok(state.with_calculations(calculations))
}

async fn evaluate(ctx: &StageContext<'_>, line: &str, expression: String) -> Calculation {
    let outcome = ctx
        .invoke_tool(Stage::Calculate, ToolCall::calculator(expression.as_str()))
        .await;

    match outcome {
        ToolOutcome::Success(text) => match extraction::parse_last_number(&text) {
            Some(value) => Calculation::computed(expression, value),
            None => Calculation::failed(line.trim(), format!("No numeric result in: {}", text)),
        },
        ToolOutcome::Failure(msg) => Calculation::failed(line.trim(), msg),
    }
}
