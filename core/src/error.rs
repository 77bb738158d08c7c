//! Fatal run errors
//!
//! Everything recoverable is recorded in the run state instead.

use crate::llm::AdapterError;
use crate::pipeline::Stage;

#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error("Problem statement is empty")]
    MissingProblem,

    #[error("Completion service failed during {stage} stage: {source}")]
    Completion {
        stage: Stage,
        #[source]
        source: AdapterError,
    },
}

impl SolveError {
    /// Stage the run died in, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            SolveError::Completion { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
