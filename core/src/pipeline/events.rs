//! Pipeline event stream
//!
//! Stages report progress as data; rendering is left to whoever holds the
//! receiving end of the channel.

use super::Stage;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

pub type EventSender = mpsc::UnboundedSender<PipelineEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<PipelineEvent>;

/// Create an event channel
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// One progress event of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineEvent {
    pub run_id: Uuid,
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    RunStarted {
        problem: String,
    },
    StageEntered {
        stage: Stage,
    },
    StageCompleted {
        stage: Stage,
    },
    /// A completion request is about to be sent
    CompletionRequested {
        stage: Stage,
        provider: String,
    },
    /// The analysis reply was unusable and the fixed decomposition was used
    AnalysisFallback {
        reason: String,
    },
    ToolInvoked {
        stage: Stage,
        tool: String,
        input: String,
    },
    ToolResult {
        stage: Stage,
        tool: String,
        success: bool,
        detail: String,
    },
    RunCompleted {
        final_estimate: String,
    },
    RunFailed {
        error: String,
    },
}

/// Per-run emitter; a dropped receiver silently discards events
#[derive(Debug, Clone)]
pub struct EventSink {
    run_id: Uuid,
    tx: Option<EventSender>,
}

impl EventSink {
    pub fn new(run_id: Uuid, tx: Option<EventSender>) -> Self {
        Self { run_id, tx }
    }

    pub fn disabled(run_id: Uuid) -> Self {
        Self { run_id, tx: None }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn emit(&self, kind: EventKind) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(PipelineEvent {
                run_id: self.run_id,
                at: Utc::now(),
                kind,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_carry_run_id() {
        let (tx, mut rx) = channel();
        let run_id = Uuid::new_v4();
        let sink = EventSink::new(run_id, Some(tx));
        sink.emit(EventKind::StageEntered {
            stage: Stage::Research,
        });

        let event = rx.try_recv().unwrap();
        assert_eq!(event.run_id, run_id);
        assert_eq!(
            event.kind,
            EventKind::StageEntered {
                stage: Stage::Research
            }
        );
    }

    #[test]
    fn test_closed_channel_is_ignored() {
        let (tx, rx) = channel();
        drop(rx);
        EventSink::new(Uuid::new_v4(), Some(tx)).emit(EventKind::RunStarted {
            problem: "p".to_string(),
        });
    }

    #[test]
    fn test_event_json_shape() {
        let event = PipelineEvent {
            run_id: Uuid::nil(),
            at: Utc::now(),
            kind: EventKind::ToolResult {
                stage: Stage::Calculate,
                tool: "calculator".to_string(),
                success: true,
                detail: "2 + 2 = 4".to_string(),
            },
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "tool_result");
        assert_eq!(value["stage"], "calculate");
        assert_eq!(value["run_id"], Uuid::nil().to_string());
    }
}
