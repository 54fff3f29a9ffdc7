//! # Errors
//!
//! Everything the conversation loop can surface to the user. Each variant is
//! caught where it happens and shown as a notice; none ends the process.

use thiserror::Error;

use crate::core::graph::DiagramError;
use crate::inference::ReplyError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChatError {
    /// The chosen model identifier has no registered capability.
    /// The session halts before any turn.
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),
    /// The model round trip failed. The turn is abandoned, the session goes on.
    #[error("Reply failed: {0}")]
    Reply(#[from] ReplyError),
    /// The optional graph diagram could not be drawn.
    #[error("Failed to display graph: {0}")]
    Diagram(#[from] DiagramError),
}
