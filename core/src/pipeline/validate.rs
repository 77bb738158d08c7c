//! Stage 4: ask the model to sanity-check the result

use super::{prompts, Stage, StageContext};
use crate::error::SolveError;
use crate::state::{FinalEstimate, RunState};

pub async fn run(state: RunState, ctx: &StageContext<'_>) -> Result<RunState, SolveError> {
    let estimate = FinalEstimate::from_calculations(state.calculations());
    let prompt = prompts::validation_prompt(state.problem(), estimate, state.calculations());
    let validation = ctx.complete(Stage::Validate, &prompt).await?;
    Ok(state.with_validation(validation, estimate))
}
