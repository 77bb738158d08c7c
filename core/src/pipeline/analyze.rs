//! Stage 1: decompose the problem
//!
//! The model is asked for a JSON object. Code fences and surrounding prose
//! are tolerated; anything that still does not decode into an analysis
//! yields [`AnalysisOutcome::Fallback`].

use super::{prompts, EventKind, Stage, StageContext};
use crate::error::SolveError;
use crate::state::{Analysis, AnalysisOutcome, RunState};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

pub async fn run(state: RunState, ctx: &StageContext<'_>) -> Result<RunState, SolveError> {
    let reply = ctx
        .complete(Stage::Analyze, &prompts::analysis_prompt(state.problem()))
        .await?;

    let outcome = match parse_analysis(&reply) {
        Ok(analysis) => AnalysisOutcome::Parsed(analysis),
        Err(reason) => {
            debug!(%reason, "analysis reply unusable, using fallback decomposition");
            ctx.events.emit(EventKind::AnalysisFallback { reason });
            AnalysisOutcome::fallback()
        }
    };
    Ok(state.with_analysis(outcome))
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    target: String,
    #[serde(default)]
    factors: Vec<Value>,
    #[serde(default)]
    research_needs: Vec<Value>,
    #[serde(default)]
    approach: String,
}

/// Decode a model reply into an [`Analysis`]
pub fn parse_analysis(reply: &str) -> Result<Analysis, String> {
    let body = strip_fences(reply);
    let raw: RawAnalysis = match serde_json::from_str(body) {
        Ok(raw) => raw,
        Err(first) => {
            let object = embedded_object(body).ok_or_else(|| first.to_string())?;
            serde_json::from_str(object).map_err(|e| e.to_string())?
        }
    };

    if raw.target.trim().is_empty() {
        return Err("analysis has an empty target".to_string());
    }

    Ok(Analysis {
        target: raw.target,
        factors: raw.factors.iter().map(text_of).collect(),
        research_needs: raw.research_needs.iter().map(text_of).collect(),
        approach: raw.approach,
    })
}

fn strip_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn embedded_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

// Models sometimes emit objects or numbers where strings were asked for.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let analysis = parse_analysis(
            r#"{"target": "Piano tuners in NYC", "factors": ["pianos"], "research_needs": ["NYC population"], "approach": "Bottom-up"}"#,
        )
        .unwrap();
        assert_eq!(analysis.target, "Piano tuners in NYC");
        assert_eq!(analysis.research_needs, vec!["NYC population"]);
        assert_eq!(analysis.approach, "Bottom-up");
    }

    #[test]
    fn test_fenced_and_embedded_json() {
        let fenced = "```json\n{\"target\": \"t\", \"research_needs\": []}\n```";
        assert_eq!(parse_analysis(fenced).unwrap().target, "t");

        let chatty = "Sure! Here it is: {\"target\": \"t2\", \"factors\": [1, {\"a\": 2}]} Hope it helps.";
        let analysis = parse_analysis(chatty).unwrap();
        assert_eq!(analysis.target, "t2");
        assert_eq!(analysis.factors, vec!["1", "{\"a\":2}"]);
        assert_eq!(analysis.approach, "");
    }

    #[test]
    fn test_non_json_is_rejected() {
        assert!(parse_analysis("I think there are about 200 piano tuners.").is_err());
        assert!(parse_analysis("{\"factors\": []}").is_err());
        assert!(parse_analysis("{\"target\": \"  \"}").is_err());
    }
}
