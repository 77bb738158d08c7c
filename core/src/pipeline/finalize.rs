//! Stage 5: render the report

use crate::state::{Analysis, FinalEstimate, RunState, NO_CALCULATIONS};

pub fn run(state: RunState) -> RunState {
    let report = render_report(&state);
    state.with_final_answer(report)
}

/// Fixed-format report for a completed run
pub fn render_report(state: &RunState) -> String {
    let estimate = state
        .final_estimate()
        .unwrap_or_else(|| FinalEstimate::from_calculations(state.calculations()));
    let target = state
        .analysis()
        .map(|a| a.target.clone())
        .unwrap_or_else(|| Analysis::fallback().target);

    let calculations = if state.calculations().is_empty() {
        format!("- {}", NO_CALCULATIONS)
    } else {
        state
            .calculations()
            .iter()
            .map(|c| format!("- {}", c))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "GUESSTIMATE SOLUTION\n\n\
         Problem: {}\n\n\
         Final Estimate: {}\n\n\
         Analysis: {}\n\n\
         Key Calculations:\n{}\n\n\
         Validation: {}",
        state.problem(),
        estimate,
        target,
        calculations,
        state.validation().unwrap_or_default(),
    )
}
