//! # Transcript
//!
//! The ordered conversation history for one session.
//!
//! ```text
//! Transcript
//! ├── [0] Message { role: User,      content: "Hi" }
//! ├── [1] Message { role: Assistant, content: "Hello! How can I help?" }
//! ├── [2] Message { role: User,      content: "..." }
//! └── ...
//! ```
//!
//! Append-only. Chronological order is display order is model-input order,
//! so the same slice feeds both the renderer and the reply request.

use serde::{Deserialize, Serialize};

/// Who said it. Serialized in chat-completions form (`"user"` / `"assistant"`).
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label shown above a message in the front ends.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One role-tagged utterance. Fields are private so a message can't change
/// after it has been appended.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns a reference to it.
    pub fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        self.messages.last().expect("just pushed")
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The full history as a reply request, oldest first.
    ///
    /// Every prior turn is resent; the model endpoint is stateless.
    pub fn projection(&self) -> Vec<Message> {
        self.messages.clone()
    }
}
