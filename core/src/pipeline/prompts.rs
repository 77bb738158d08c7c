//! Prompt templates for the three model-backed stages

use crate::state::{Analysis, Calculation, FinalEstimate, Research};

pub fn analysis_prompt(problem: &str) -> String {
    format!(
        "Analyze this guesstimate problem and break it down into components:\n\
         \n\
         Problem: {problem}\n\
         \n\
         Identify:\n\
         1. What needs to be estimated\n\
         2. Key factors and assumptions needed\n\
         3. What research might be helpful\n\
         4. Calculation approach\n\
         \n\
         Respond in JSON format with keys: target, factors, research_needs, approach"
    )
}

pub fn calculation_prompt(analysis: &Analysis, research: &Research) -> String {
    let analysis_json = serde_json::to_string(analysis).unwrap_or_default();
    let research_json = serde_json::to_string(research).unwrap_or_default();
    format!(
        "Based on this analysis and research, create calculation steps:\n\
         \n\
         Analysis: {analysis_json}\n\
         Research: {research_json}\n\
         \n\
         Provide specific mathematical expressions to calculate the estimate.\n\
         Use realistic numbers based on the research.\n\
         Write one step per line in the form `<expression> = <value>`, using only \
         digits, + - * / % ( ) and sqrt() in the expression."
    )
}

pub fn validation_prompt(
    problem: &str,
    estimate: FinalEstimate,
    calculations: &[Calculation],
) -> String {
    let listing = if calculations.is_empty() {
        "none".to_string()
    } else {
        calculations
            .iter()
            .map(|c| format!("- {}", c))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "Validate this guesstimate result:\n\
         \n\
         Problem: {problem}\n\
         Final Result: {estimate}\n\
         Calculations:\n{listing}\n\
         \n\
         Is this result reasonable? Provide validation and any adjustments needed."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Finding;

    #[test]
    fn test_analysis_prompt_embeds_problem() {
        let prompt = analysis_prompt("How many dentists in Ohio?");
        assert!(prompt.contains("Problem: How many dentists in Ohio?"));
        assert!(prompt.contains("target, factors, research_needs, approach"));
    }

    #[test]
    fn test_validation_prompt_without_calculations() {
        let prompt = validation_prompt("p", FinalEstimate::NoCalculations, &[]);
        assert!(prompt.contains("Final Result: No calculations performed"));
        assert!(prompt.contains("Calculations:\nnone"));
    }

    #[test]
    fn test_calculation_prompt_carries_analysis_and_research() {
        let analysis = Analysis {
            target: "Piano tuners in NYC".to_string(),
            factors: vec!["Pianos per household".to_string()],
            research_needs: vec!["NYC population".to_string()],
            approach: "Households times pianos over tunings per tuner".to_string(),
        };
        let mut research = Research::new();
        research.insert("NYC population", Finding::Found("8 million".to_string()));
        research.insert("Pianos per household", Finding::Failed("timeout".to_string()));

        let prompt = calculation_prompt(&analysis, &research);
        assert!(prompt.contains(r#"Analysis: {"target":"Piano tuners in NYC""#));
        assert!(prompt.contains("Households times pianos over tunings per tuner"));
        assert!(prompt.contains(
            r#"Research: {"NYC population":"8 million","Pianos per household":"Error: timeout"}"#
        ));
    }

    #[test]
    fn test_calculation_prompt_with_empty_research() {
        let prompt = calculation_prompt(&Analysis::fallback(), &Research::new());
        assert!(prompt.contains("Unknown estimation target"));
        assert!(prompt.contains("Research: {}"));
    }

    #[test]
    fn test_validation_prompt_lists_calculations() {
        let calculations = vec![
            Calculation::computed("2 + 3", 5.0),
            Calculation::failed("x", "bad"),
        ];
        let prompt = validation_prompt(
            "How many bikes in Amsterdam?",
            FinalEstimate::Value(5.0),
            &calculations,
        );
        assert!(prompt.contains("Problem: How many bikes in Amsterdam?"));
        assert!(prompt.contains("Final Result: 5\n"));
        assert!(prompt.contains("Calculations:\n- 2 + 3 = 5\n- x = Error"));
        assert!(!prompt.contains("Calculations:\nnone"));
    }
}
