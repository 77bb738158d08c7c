//! Run state threaded through the estimation pipeline
//!
//! One [`RunState`] exists per `solve()` call. It starts with only the
//! problem set and grows stage by stage; a field written by one stage is
//! read by later stages but never rewritten.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Upper bound on web-search lookups per run
pub const MAX_RESEARCH_LOOKUPS: usize = 3;

/// Sentinel rendered when no calculation produced a number
pub const NO_CALCULATIONS: &str = "No calculations performed";

/// Structured decomposition of the problem (stage 1 output)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// What needs to be estimated
    pub target: String,
    /// Key factors and assumptions
    pub factors: Vec<String>,
    /// Facts worth looking up before calculating
    pub research_needs: Vec<String>,
    /// Calculation approach
    pub approach: String,
}

impl Analysis {
    /// Fixed decomposition used when the model reply cannot be parsed
    pub fn fallback() -> Self {
        Self {
            target: "Unknown estimation target".to_string(),
            factors: vec![
                "Population".to_string(),
                "Market size".to_string(),
                "Usage patterns".to_string(),
            ],
            research_needs: vec![
                "Current market data".to_string(),
                "Demographics".to_string(),
            ],
            approach: "Top-down estimation".to_string(),
        }
    }
}

/// Where an [`Analysis`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    Parsed,
    Fallback,
}

/// Analysis together with how it was obtained
///
/// Serializes as two sibling fields, `analysis` (the plain decomposition)
/// and `analysis_source`, so it can be flattened into [`RunState`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Decoded from the model reply
    Parsed(Analysis),
    /// Reply was unusable; holds [`Analysis::fallback`]
    Fallback(Analysis),
}

impl AnalysisOutcome {
    pub fn fallback() -> Self {
        AnalysisOutcome::Fallback(Analysis::fallback())
    }

    pub fn analysis(&self) -> &Analysis {
        match self {
            AnalysisOutcome::Parsed(a) | AnalysisOutcome::Fallback(a) => a,
        }
    }

    pub fn source(&self) -> AnalysisSource {
        match self {
            AnalysisOutcome::Parsed(_) => AnalysisSource::Parsed,
            AnalysisOutcome::Fallback(_) => AnalysisSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source() == AnalysisSource::Fallback
    }
}

impl Serialize for AnalysisOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("analysis", self.analysis())?;
        map.serialize_entry("analysis_source", &self.source())?;
        map.end()
    }
}

/// Result of a single research lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    /// Search text returned by the tool
    Found(String),
    /// Lookup failed; message from the tool client
    Failed(String),
}

impl Finding {
    pub fn is_failed(&self) -> bool {
        matches!(self, Finding::Failed(_))
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::Found(text) => write!(f, "{}", text),
            Finding::Failed(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// Ordered mapping from research need to finding
///
/// Insertion order is preserved. Re-inserting an existing need replaces
/// its finding in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Research {
    entries: Vec<(String, Finding)>,
}

impl Research {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, need: impl Into<String>, finding: Finding) {
        let need = need.into();
        match self.entries.iter_mut().find(|(n, _)| *n == need) {
            Some(entry) => entry.1 = finding,
            None => self.entries.push((need, finding)),
        }
    }

    pub fn get(&self, need: &str) -> Option<&Finding> {
        self.entries
            .iter()
            .find(|(n, _)| n == need)
            .map(|(_, finding)| finding)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn needs(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Finding)> {
        self.entries.iter().map(|(n, f)| (n.as_str(), f))
    }
}

impl Serialize for Research {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (need, finding) in &self.entries {
            map.serialize_entry(need, &finding.to_string())?;
        }
        map.end()
    }
}

/// Outcome of one calculator attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalcOutcome {
    Result(f64),
    Error(String),
}

/// One entry of the calculation log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    pub expression: String,
    #[serde(flatten)]
    pub outcome: CalcOutcome,
}

impl Calculation {
    pub fn computed(expression: impl Into<String>, value: f64) -> Self {
        Self {
            expression: expression.into(),
            outcome: CalcOutcome::Result(value),
        }
    }

    pub fn failed(expression: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            outcome: CalcOutcome::Error(error.into()),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self.outcome {
            CalcOutcome::Result(v) => Some(v),
            CalcOutcome::Error(_) => None,
        }
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            CalcOutcome::Result(v) => write!(f, "{} = {}", self.expression, format_number(*v)),
            CalcOutcome::Error(_) => write!(f, "{} = Error", self.expression),
        }
    }
}

/// Headline number of the run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FinalEstimate {
    Value(f64),
    NoCalculations,
}

impl FinalEstimate {
    /// Value of the last successful calculation, or the sentinel
    pub fn from_calculations(calculations: &[Calculation]) -> Self {
        calculations
            .iter()
            .rev()
            .find_map(Calculation::value)
            .map(FinalEstimate::Value)
            .unwrap_or(FinalEstimate::NoCalculations)
    }
}

impl fmt::Display for FinalEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalEstimate::Value(v) => write!(f, "{}", format_number(*v)),
            FinalEstimate::NoCalculations => write!(f, "{}", NO_CALCULATIONS),
        }
    }
}

impl Serialize for FinalEstimate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FinalEstimate::Value(v) => serializer.serialize_f64(*v),
            FinalEstimate::NoCalculations => serializer.serialize_str(NO_CALCULATIONS),
        }
    }
}

/// Render a number the way calculator results are printed
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

/// Accumulated state of one estimation run
#[derive(Debug, Clone, Serialize)]
pub struct RunState {
    run_id: Uuid,
    problem: String,
    #[serde(flatten)]
    analysis: Option<AnalysisOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    research: Option<Research>,
    #[serde(skip_serializing_if = "Option::is_none")]
    calculations: Option<Vec<Calculation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    final_estimate: Option<FinalEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    final_answer: Option<String>,
}

impl RunState {
    /// Fresh state holding only the problem
    pub fn new(problem: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            problem: problem.into(),
            analysis: None,
            research: None,
            calculations: None,
            validation: None,
            final_estimate: None,
            final_answer: None,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn problem(&self) -> &str {
        &self.problem
    }

    pub fn analysis_outcome(&self) -> Option<&AnalysisOutcome> {
        self.analysis.as_ref()
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref().map(AnalysisOutcome::analysis)
    }

    pub fn research(&self) -> Option<&Research> {
        self.research.as_ref()
    }

    /// Calculation log; empty until the calculate stage has run
    pub fn calculations(&self) -> &[Calculation] {
        self.calculations.as_deref().unwrap_or(&[])
    }

    pub fn validation(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    pub fn final_estimate(&self) -> Option<FinalEstimate> {
        self.final_estimate
    }

    pub fn final_answer(&self) -> Option<&str> {
        self.final_answer.as_deref()
    }

    pub(crate) fn with_analysis(mut self, analysis: AnalysisOutcome) -> Self {
        debug_assert!(self.analysis.is_none(), "analysis written twice");
        self.analysis = Some(analysis);
        self
    }

    pub(crate) fn with_research(mut self, research: Research) -> Self {
        debug_assert!(self.research.is_none(), "research written twice");
        self.research = Some(research);
        self
    }

    pub(crate) fn with_calculations(mut self, calculations: Vec<Calculation>) -> Self {
        debug_assert!(self.calculations.is_none(), "calculations written twice");
        self.calculations = Some(calculations);
        self
    }

    pub(crate) fn with_validation(mut self, validation: String, estimate: FinalEstimate) -> Self {
        debug_assert!(self.validation.is_none(), "validation written twice");
        self.validation = Some(validation);
        self.final_estimate = Some(estimate);
        self
    }

    pub(crate) fn with_final_answer(mut self, answer: String) -> Self {
        debug_assert!(self.final_answer.is_none(), "final answer written twice");
        self.final_answer = Some(answer);
        self
    }
}
