//! Guesstimate Core
//!
//! The estimation pipeline: run state, expression extraction, the tool
//! client, completion adapters, the five stages and the [`Solver`] facade
//! that drives them.

pub mod config;
pub mod error;
pub mod extraction;
pub mod llm;
pub mod pipeline;
pub mod solver;
pub mod state;
pub mod tool_client;

pub use config::{GuesstimateConfig, LlmConfig, LlmProvider, ServerConfig, ToolMode, ToolsConfig};
pub use error::SolveError;
pub use pipeline::{EventKind, EventReceiver, EventSender, Pipeline, PipelineEvent, Stage};
pub use solver::Solver;
pub use state::{
    Analysis, AnalysisOutcome, AnalysisSource, CalcOutcome, Calculation, FinalEstimate, Finding, Research,
    RunState, MAX_RESEARCH_LOOKUPS, NO_CALCULATIONS,
};
pub use tool_client::{ToolCall, ToolClient, ToolOutcome};
