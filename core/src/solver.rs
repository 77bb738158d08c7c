//! Solver facade
//!
//! `solve(problem)` seeds a fresh [`RunState`], drives the [`Pipeline`] and
//! hands back the final report. Each call owns its own state, so a single
//! solver can serve concurrent runs.

use crate::config::GuesstimateConfig;
use crate::error::SolveError;
use crate::llm::{create_adapter, Adapter, AdapterError, LlmAdapter};
use crate::pipeline::{finalize, EventSender, EventSink, Pipeline, StageContext};
use crate::state::RunState;
use crate::tool_client::ToolClient;
use tracing::debug;

pub struct Solver {
    llm: Adapter,
    tools: ToolClient,
    pipeline: Pipeline,
    events: Option<EventSender>,
}

impl Solver {
    pub fn new(llm: Adapter, tools: ToolClient) -> Self {
        Self {
            llm,
            tools,
            pipeline: Pipeline::new(),
            events: None,
        }
    }

    /// Solver wired from configuration
    pub fn from_config(config: &GuesstimateConfig) -> Result<Self, AdapterError> {
        let llm = create_adapter(&config.llm)?;
        let tools = ToolClient::from_config(&config.tools, &config.search);
        Ok(Self::new(llm, tools))
    }

    /// Stream progress events of every run to `tx`
    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.llm.provider_name()
    }

    pub fn tools(&self) -> &ToolClient {
        &self.tools
    }

    /// Solve `problem` and return the final report
    pub async fn solve(&self, problem: &str) -> Result<String, SolveError> {
        let state = self.run(problem).await?;
        Ok(state
            .final_answer()
            .map(str::to_owned)
            .unwrap_or_else(|| finalize::render_report(&state)))
    }

    /// Solve `problem` and return the whole run state
    pub async fn run(&self, problem: &str) -> Result<RunState, SolveError> {
        if problem.trim().is_empty() {
            return Err(SolveError::MissingProblem);
        }

        let state = RunState::new(problem);
        let sink = EventSink::new(state.run_id(), self.events.clone());
        let ctx = StageContext {
            llm: &self.llm,
            tools: &self.tools,
            events: &sink,
        };

        debug!(run_id = %state.run_id(), provider = self.llm.provider_name(), "solving: {}", problem);
        match self.pipeline.run(state, &ctx).await {
            Ok(state) => {
                debug!(run_id = %state.run_id(), "run completed");
                Ok(state)
            }
            Err(e) => {
                debug!(run_id = %sink.run_id(), error = %e, "run aborted");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("provider", &self.llm.provider_name())
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}
