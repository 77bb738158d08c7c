//! Scripted tool backend for tests

use super::{ToolCall, ToolClientError};
use guesstimate_tools::ToolResponse;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;

/// One scripted reply
#[derive(Debug, Clone, PartialEq)]
pub enum FakeReply {
    /// Return this envelope
    Respond(ToolResponse),
    /// Fail at the transport level with this message
    Fail(String),
    /// Never answer
    Hang,
}

impl FakeReply {
    pub fn ok(result: impl Into<String>) -> Self {
        FakeReply::Respond(ToolResponse::ok(result))
    }

    pub fn tool_error(error: impl Into<String>) -> Self {
        FakeReply::Respond(ToolResponse::failed(error))
    }
}

type Responder = Box<dyn Fn(&ToolCall) -> FakeReply + Send + Sync>;

/// Replays scripted replies in order, then asks the responder
pub struct FakeToolBackend {
    script: Mutex<VecDeque<FakeReply>>,
    responder: Responder,
    calls: Mutex<Vec<ToolCall>>,
}

impl FakeToolBackend {
    pub fn scripted<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = FakeReply>,
    {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            responder: Box::new(|_| FakeReply::Fail("fake tool script exhausted".to_string())),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with `responder`
    pub fn responding<F>(responder: F) -> Self
    where
        F: Fn(&ToolCall) -> FakeReply + Send + Sync + 'static,
    {
        Self {
            script: Mutex::new(VecDeque::new()),
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls received so far, oldest first
    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub(super) async fn send(&self, call: &ToolCall) -> Result<ToolResponse, ToolClientError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.clone());
        }
        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match scripted.unwrap_or_else(|| (self.responder)(call)) {
            FakeReply::Respond(response) => Ok(response),
            FakeReply::Fail(msg) => Err(ToolClientError::Transport(msg)),
            FakeReply::Hang => {
                futures::future::pending::<()>().await;
                Err(ToolClientError::Transport("unreachable".to_string()))
            }
        }
    }
}

impl fmt::Debug for FakeToolBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeToolBackend")
            .field("script", &self.script)
            .field("calls", &self.calls)
            .finish_non_exhaustive()
    }
}
