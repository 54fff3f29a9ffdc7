//! # Session
//!
//! A `ChatSession` is the context object that owns the transcript and the
//! model choice for one user session. Both are mirrored into a `SessionStore`
//! after every change so a front end can re-open the same session (e.g. after a
//! redraw) and find its history intact.
//!
//! The store is injected, which keeps tests free of any global state. Only an
//! in-memory store exists: nothing outlives the process.

use std::collections::HashMap;

use log::{debug, info, warn};
use serde_json::Value;

use crate::core::transcript::{Message, Transcript};
use crate::inference::ModelChoice;

/// Store key holding the serialized transcript.
pub const MESSAGES_KEY: &str = "messages";
/// Store key holding the raw model-choice identifier.
pub const MODEL_CHOICE_KEY: &str = "model_choice";

/// Key/value storage scoped to one session.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
}

/// Process-scoped store. Dropped with the session.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }
}

pub struct ChatSession {
    pub id: String,
    store: Box<dyn SessionStore>,
    transcript: Transcript,
    model_choice: ModelChoice,
}

impl ChatSession {
    /// Opens the session held in `store`, creating an empty transcript if the
    /// store has none. `default_choice` is used only when the store has no
    /// model choice recorded yet; once recorded it is fixed for the session.
    pub fn open(mut store: Box<dyn SessionStore>, default_choice: &str) -> Self {
        let transcript = match store.get(MESSAGES_KEY) {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("Stored transcript is unreadable, starting empty: {}", e);
                Transcript::new()
            }),
            None => Transcript::new(),
        };

        let raw_choice = match store.get(MODEL_CHOICE_KEY) {
            Some(Value::String(s)) => s,
            _ => {
                store.set(MODEL_CHOICE_KEY, Value::String(default_choice.to_string()));
                default_choice.to_string()
            }
        };

        let mut session = Self {
            id: uuid::Uuid::new_v4().to_string(),
            store,
            transcript,
            model_choice: ModelChoice::parse(&raw_choice),
        };
        session.persist_transcript();

        info!(
            "Opened session {} ({} messages, model choice {:?})",
            session.id,
            session.transcript.len(),
            session.model_choice
        );
        session
    }

    /// Fresh session over a new `MemoryStore`.
    pub fn in_memory(default_choice: &str) -> Self {
        Self::open(Box::new(MemoryStore::new()), default_choice)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn model_choice(&self) -> &ModelChoice {
        &self.model_choice
    }

    /// Appends a message and writes the transcript back to the store.
    pub fn append(&mut self, message: Message) -> &Message {
        debug!(
            "Session {}: appending {} message ({} bytes)",
            self.id,
            message.role().label(),
            message.content().len()
        );
        self.transcript.push(message);
        self.persist_transcript();
        self.transcript.last().expect("just appended")
    }

    /// Gives the store back, e.g. to re-open the session later.
    pub fn into_store(self) -> Box<dyn SessionStore> {
        self.store
    }

    fn persist_transcript(&mut self) {
        match serde_json::to_value(&self.transcript) {
            Ok(value) => self.store.set(MESSAGES_KEY, value),
            Err(e) => warn!("Failed to serialize transcript for session {}: {}", self.id, e),
        }
    }
}
