//! # Application State
//!
//! Core business state for parley. No TUI types here; presentation state
//! lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session: ChatSession                         // transcript + model choice
//! ├── capability: Option<Arc<dyn ReplyCapability>> // None = unsupported model
//! ├── status_message: String                       // status bar text
//! ├── is_loading: bool                             // reply outstanding
//! ├── error: Option<String>                        // last visible error
//! └── diagram: Option<Result<Diagram, ChatError>>  // graph panel content
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::core::error::ChatError;
use crate::core::graph::Diagram;
use crate::core::session::ChatSession;
use crate::core::transcript::Transcript;
use crate::inference::ReplyCapability;

pub struct App {
    pub session: ChatSession,
    /// Absent when the session's model choice has no registered capability.
    /// No turn is ever attempted without one.
    pub capability: Option<Arc<dyn ReplyCapability>>,
    pub status_message: String,
    pub is_loading: bool,
    pub error: Option<String>,
    pub diagram: Option<Result<Diagram, ChatError>>,
}

impl App {
    pub fn new(session: ChatSession, capability: Arc<dyn ReplyCapability>) -> Self {
        Self {
            session,
            capability: Some(capability),
            status_message: String::from("Welcome to parley!"),
            is_loading: false,
            error: None,
            diagram: None,
        }
    }

    /// An app that refuses every turn, showing why.
    pub fn halted(session: ChatSession, error: ChatError) -> Self {
        Self {
            session,
            capability: None,
            status_message: String::from("Session halted"),
            is_loading: false,
            error: Some(error.to_string()),
            diagram: None,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        self.session.transcript()
    }

    pub fn model_name(&self) -> &str {
        self.capability
            .as_ref()
            .map(|c| c.model_name())
            .unwrap_or("none")
    }

    pub fn is_halted(&self) -> bool {
        self.capability.is_none()
    }
}
