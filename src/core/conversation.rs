//! # Conversation Loop
//!
//! One turn, start to finish, against any display layer:
//!
//! ```text
//! handle_user_input("Hi")
//!   ├── update(Submit)         → transcript += user "Hi"
//!   ├── view.show_message      → user sees their own text right away
//!   ├── capability.reply(all)  → one round trip, whole history
//!   └── update(ReplyReceived)  → transcript += assistant reply
//!                                 (or: view.show_error, user turn stays)
//! ```
//!
//! The TUI runs the same two reducer steps with the round trip on a spawned
//! task; the REPL and tests go through `handle_user_input`.

use log::{info, warn};

use crate::core::action::{Action, Effect, update};
use crate::core::error::ChatError;
use crate::core::graph::{ChatGraph, Diagram, DiagramRenderer};
use crate::core::state::App;
use crate::core::transcript::{Message, Transcript};
use crate::inference::ReplyError;

/// The display layer as seen from the conversation loop.
pub trait ChatView {
    fn show_message(&mut self, message: &Message);
    fn show_diagram(&mut self, diagram: &Diagram);
    fn show_error(&mut self, error: &str);
}

/// What became of one call to `handle_user_input`.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Empty input, a halted session, or a turn already in flight.
    Ignored,
    Answered(Message),
    Failed(ReplyError),
}

/// Runs one turn for `text`.
///
/// Errors are shown on `view` and reported in the outcome; the session is
/// always left ready for the next input.
pub async fn handle_user_input(app: &mut App, text: &str, view: &mut dyn ChatView) -> TurnOutcome {
    let request = match update(app, Action::Submit(text.to_string())) {
        Effect::RequestReply(request) => request,
        _ => return TurnOutcome::Ignored,
    };

    if let Some(user) = app.transcript().last() {
        view.show_message(user);
    }

    let Some(capability) = app.capability.clone() else {
        // update() refuses to start a turn without a capability
        return TurnOutcome::Ignored;
    };
    let result = capability.reply(&request).await;

    let outcome = match &result {
        Ok(_) => None,
        Err(e) => Some(e.clone()),
    };
    update(app, Action::ReplyReceived(result));

    match outcome {
        None => match app.transcript().last() {
            Some(reply) => {
                view.show_message(reply);
                TurnOutcome::Answered(reply.clone())
            }
            None => TurnOutcome::Ignored,
        },
        Some(e) => {
            view.show_error(&ChatError::Reply(e.clone()).to_string());
            TurnOutcome::Failed(e)
        }
    }
}

/// Shows every message in order. Reads only.
pub fn render_transcript(transcript: &Transcript, view: &mut dyn ChatView) {
    for message in transcript.messages() {
        view.show_message(message);
    }
}

/// Draws the chat graph; a failure becomes a notice and nothing else.
pub fn show_graph(
    graph: &ChatGraph,
    renderer: &dyn DiagramRenderer,
    view: &mut dyn ChatView,
) -> Result<Diagram, ChatError> {
    match renderer.render(graph) {
        Ok(diagram) => {
            info!("Graph diagram rendered ({} lines)", diagram.height());
            view.show_diagram(&diagram);
            Ok(diagram)
        }
        Err(e) => {
            let err = ChatError::Diagram(e);
            warn!("{}", err);
            view.show_error(&err.to_string());
            Err(err)
        }
    }
}
