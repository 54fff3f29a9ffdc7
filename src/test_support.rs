//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::conversation::ChatView;
use crate::core::graph::Diagram;
use crate::core::session::ChatSession;
use crate::core::state::App;
use crate::core::transcript::Message;
use crate::inference::{OPENAI_CHATGPT, ReplyCapability, ReplyError};

/// A capability that plays back scripted replies and records every request.
/// Once the script runs out, the last entry repeats.
pub struct ScriptedReply {
    script: Mutex<VecDeque<Result<String, ReplyError>>>,
    last: Mutex<Option<Result<String, ReplyError>>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedReply {
    pub fn new(script: Vec<Result<String, ReplyError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn always(reply: &str) -> Arc<Self> {
        Self::new(vec![Ok(reply.to_string())])
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyCapability for ScriptedReply {
    fn model_name(&self) -> &str {
        "test-model"
    }

    async fn reply(&self, request: &[Message]) -> Result<Message, ReplyError> {
        self.requests.lock().unwrap().push(request.to_vec());

        let next = self.script.lock().unwrap().pop_front();
        let entry = match next {
            Some(entry) => {
                *self.last.lock().unwrap() = Some(entry.clone());
                entry
            }
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .unwrap_or(Err(ReplyError::EmptyReply)),
        };
        entry.map(Message::assistant)
    }
}

/// One thing a `RecordingView` was asked to show.
#[derive(Debug, Clone, PartialEq)]
pub enum Shown {
    Message(Message),
    Diagram(Diagram),
    Error(String),
}

#[derive(Default)]
pub struct RecordingView {
    pub shown: Vec<Shown>,
}

impl ChatView for RecordingView {
    fn show_message(&mut self, message: &Message) {
        self.shown.push(Shown::Message(message.clone()));
    }

    fn show_diagram(&mut self, diagram: &Diagram) {
        self.shown.push(Shown::Diagram(diagram.clone()));
    }

    fn show_error(&mut self, error: &str) {
        self.shown.push(Shown::Error(error.to_string()));
    }
}

pub fn test_session() -> ChatSession {
    ChatSession::in_memory(OPENAI_CHATGPT)
}

pub fn app_with(capability: Arc<ScriptedReply>) -> App {
    App::new(test_session(), capability)
}

/// Creates a test App whose capability always answers "ok".
pub fn test_app() -> App {
    app_with(ScriptedReply::always("ok"))
}
