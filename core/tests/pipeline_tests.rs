//! End-to-end pipeline runs against scripted collaborators

use guesstimate_core::llm::{Adapter, AdapterError, StubAdapter};
use guesstimate_core::pipeline::events::channel;
use guesstimate_core::pipeline::{EventSink, Pipeline, StageContext};
use guesstimate_core::tool_client::{FakeReply, FakeToolBackend, ToolCall, ToolClient};
use guesstimate_core::{
    CalcOutcome, EventKind, FinalEstimate, Finding, RunState, SolveError, Solver, Stage,
    NO_CALCULATIONS,
};
use guesstimate_tools::ToolRegistry;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

const ANALYSIS: &str = r#"{
    "target": "Number of piano tuners in NYC",
    "factors": ["population", "pianos per household", "tunings per year"],
    "research_needs": ["NYC population", "piano ownership rate", "tuner workload",
                       "piano age distribution", "tuning prices"],
    "approach": "Bottom-up from households"
}"#;

const CALCULATION: &str = "Step 1: 8000000 / 2.5 = 3200000 households\n\
                           Step 2: 3200000 * 0.05 = 160000 pianos\n\
                           Assume most pianos are tuned once a year.\n\
                           Step 3: 160000 / 1000 = 160 tuners";

fn solver(replies: &[&str], tools: ToolClient) -> Solver {
    Solver::new(
        Adapter::from(StubAdapter::scripted(replies.iter().copied())),
        tools,
    )
}

fn local_tools() -> ToolClient {
    ToolClient::local(ToolRegistry::default(), TIMEOUT)
}

#[tokio::test]
async fn test_problem_passes_through_to_report() {
    for problem in [
        "How many piano tuners are there in New York City?",
        "weird   spacing\tand ünïcode?",
        "   leading and trailing   ",
    ] {
        let report = solver(&[ANALYSIS, CALCULATION, "Reasonable."], local_tools())
            .solve(problem)
            .await
            .unwrap();
        assert!(report.contains(problem), "report lost the problem: {report}");
    }
}

#[tokio::test]
async fn test_full_run_with_local_tools() {
    let state = solver(&[ANALYSIS, CALCULATION, "Reasonable."], local_tools())
        .run("How many piano tuners are there in New York City?")
        .await
        .unwrap();

    let expressions: Vec<&str> = state
        .calculations()
        .iter()
        .map(|c| c.expression.as_str())
        .collect();
    assert_eq!(
        expressions,
        vec!["8000000 / 2.5", "3200000 * 0.05", "160000 / 1000"]
    );
    assert_eq!(state.final_estimate(), Some(FinalEstimate::Value(160.0)));
    assert_eq!(state.validation(), Some("Reasonable."));

    let report = state.final_answer().unwrap();
    assert!(report.starts_with("GUESSTIMATE SOLUTION"));
    assert!(report.contains("Final Estimate: 160\n"));
    assert!(report.contains("Analysis: Number of piano tuners in NYC"));
    assert!(report.contains("- 3200000 * 0.05 = 160000"));
    assert!(report.ends_with("Validation: Reasonable."));
}

#[tokio::test]
async fn test_research_truncated_to_three_in_order() {
    let fake = FakeToolBackend::responding(|call| match call {
        ToolCall::WebSearch { query } => FakeReply::ok(format!("about {query}")),
        ToolCall::Calculator { .. } => FakeReply::ok("1 = 1"),
    });
    let state = solver(&[ANALYSIS, "no math here", "ok"], ToolClient::fake(fake, TIMEOUT))
        .run("piano tuners")
        .await
        .unwrap();

    let research = state.research().unwrap();
    assert_eq!(research.len(), 3);
    let needs: Vec<&str> = research.needs().collect();
    assert_eq!(
        needs,
        vec!["NYC population", "piano ownership rate", "tuner workload"]
    );
    assert_eq!(
        research.get("tuner workload"),
        Some(&Finding::Found("about tuner workload".to_string()))
    );
}

#[tokio::test]
async fn test_failed_lookup_does_not_affect_siblings() {
    let fake = FakeToolBackend::responding(|call| match call {
        ToolCall::WebSearch { query } if query == "piano ownership rate" => {
            FakeReply::Fail("connection refused".to_string())
        }
        ToolCall::WebSearch { query } => FakeReply::ok(format!("about {query}")),
        ToolCall::Calculator { .. } => FakeReply::ok("0"),
    });
    let state = solver(&[ANALYSIS, "", ""], ToolClient::fake(fake, TIMEOUT))
        .run("p")
        .await
        .unwrap();

    let research = state.research().unwrap();
    assert!(research.get("piano ownership rate").unwrap().is_failed());
    assert!(!research.get("NYC population").unwrap().is_failed());
    assert!(!research.get("tuner workload").unwrap().is_failed());
}

#[tokio::test]
async fn test_all_calculations_fail_still_reports() {
    let fake = FakeToolBackend::responding(|call| match call {
        ToolCall::WebSearch { .. } => FakeReply::ok("nothing useful"),
        ToolCall::Calculator { .. } => FakeReply::tool_error("division by zero"),
    });
    let state = solver(&[ANALYSIS, CALCULATION, "Cannot judge."], ToolClient::fake(fake, TIMEOUT))
        .run("piano tuners")
        .await
        .unwrap();

    assert_eq!(state.calculations().len(), 3);
    assert!(state
        .calculations()
        .iter()
        .all(|c| matches!(c.outcome, CalcOutcome::Error(_))));
    assert_eq!(state.calculations()[0].expression, "Step 1: 8000000 / 2.5 = 3200000 households");
    assert_eq!(state.final_estimate(), Some(FinalEstimate::NoCalculations));

    let report = state.final_answer().unwrap();
    assert!(!report.is_empty());
    assert!(report.contains(&format!("Final Estimate: {}", NO_CALCULATIONS)));
}

#[tokio::test]
async fn test_non_numeric_tool_reply_is_a_failed_entry() {
    let fake = FakeToolBackend::responding(|call| match call {
        ToolCall::WebSearch { .. } => FakeReply::ok("n/a"),
        ToolCall::Calculator { .. } => FakeReply::ok("cannot compute"),
    });
    let state = solver(&[ANALYSIS, "2 + 2 = 4", "ok"], ToolClient::fake(fake, TIMEOUT))
        .run("p")
        .await
        .unwrap();

    match &state.calculations()[0].outcome {
        CalcOutcome::Error(msg) => assert!(msg.starts_with("No numeric result")),
        other => panic!("expected error entry, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_analysis_falls_back() {
    let state = solver(
        &["There are probably a few hundred.", "", "fine"],
        local_tools(),
    )
    .run("How many piano tuners?")
    .await
    .unwrap();

    let outcome = state.analysis_outcome().unwrap();
    assert!(outcome.is_fallback());
    assert_eq!(state.analysis().unwrap().approach, "Top-down estimation");
    assert_eq!(
        state.research().unwrap().needs().collect::<Vec<_>>(),
        vec!["Current market data", "Demographics"]
    );
    assert!(state.calculations().is_empty());
}

#[tokio::test]
async fn test_blank_problem_is_fatal() {
    let err = solver(&[], local_tools()).solve("   ").await.unwrap_err();
    assert!(matches!(err, SolveError::MissingProblem));
}

#[tokio::test]
async fn test_completion_outage_aborts_run() {
    let solver = Solver::new(
        Adapter::from(StubAdapter::unreachable("connection refused")),
        local_tools(),
    );
    let err = solver.solve("anything").await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Analyze));
    assert!(matches!(
        err,
        SolveError::Completion {
            source: AdapterError::Network(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_event_stream_covers_every_stage() {
    let (tx, mut rx) = channel();
    let solver = solver(&[ANALYSIS, CALCULATION, "ok"], local_tools()).with_events(tx);
    let state = solver.run("piano tuners").await.unwrap();
    drop(solver);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        assert_eq!(event.run_id, state.run_id());
        events.push(event.kind);
    }

    assert!(matches!(events.first(), Some(EventKind::RunStarted { .. })));
    assert!(matches!(events.last(), Some(EventKind::RunCompleted { .. })));

    let completed: Vec<Stage> = events
        .iter()
        .filter_map(|e| match e {
            EventKind::StageCompleted { stage } => Some(*stage),
            _ => None,
        })
        .collect();
    assert_eq!(completed, Stage::ALL.to_vec());

    let tool_calls = events
        .iter()
        .filter(|e| matches!(e, EventKind::ToolInvoked { .. }))
        .count();
    assert_eq!(tool_calls, 3 + 3);
}

#[tokio::test]
async fn test_later_prompts_carry_earlier_stage_output() {
    let llm = Adapter::from(StubAdapter::scripted([ANALYSIS, CALCULATION, "Fine."]));
    let fake = FakeToolBackend::responding(|call| match call {
        ToolCall::WebSearch { query } if query == "tuner workload" => {
            FakeReply::Fail("connection refused".to_string())
        }
        ToolCall::WebSearch { query } => FakeReply::ok(format!("about {query}")),
        ToolCall::Calculator { expression } => FakeReply::ok(match expression.as_str() {
            "8000000 / 2.5" => "3200000",
            "3200000 * 0.05" => "160000",
            _ => "160",
        }),
    });
    let tools = ToolClient::fake(fake, TIMEOUT);
    let state = RunState::new("How many piano tuners in NYC?");
    let events = EventSink::new(state.run_id(), None);
    let ctx = StageContext {
        llm: &llm,
        tools: &tools,
        events: &events,
    };
    Pipeline::new().run(state, &ctx).await.unwrap();

    let Adapter::Stub(stub) = &llm else {
        unreachable!("built from a stub");
    };
    let prompts = stub.prompts();
    assert_eq!(prompts.len(), 3);

    let calculation = &prompts[1];
    assert!(calculation.contains(r#""target":"Number of piano tuners in NYC""#));
    assert!(calculation.contains("Bottom-up from households"));
    assert!(calculation.contains(r#""NYC population":"about NYC population""#));
    assert!(calculation.contains(r#""tuner workload":"Error: "#));
    assert!(!calculation.contains(r#""piano age distribution":"#));

    let validation = &prompts[2];
    assert!(validation.contains("Problem: How many piano tuners in NYC?"));
    assert!(validation.contains("Final Result: 160\n"));
    assert!(validation.contains(
        "Calculations:\n- 8000000 / 2.5 = 3200000\n- 3200000 * 0.05 = 160000\n- 160000 / 1000 = 160"
    ));
}
