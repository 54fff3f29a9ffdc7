//! # Actions
//!
//! Everything that can happen in a session becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The model answers? That's `Action::ReplyReceived(Ok(message))`.
//!
//! `update()` applies an action to the state and returns the `Effect` the
//! caller must carry out. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! A turn is always two actions: `Submit` appends the user message and asks
//! for a reply with the full transcript; `ReplyReceived` appends the answer or
//! records the failure.

use log::{debug, info, warn};

use crate::core::state::App;
use crate::core::transcript::{Message, Role};
use crate::inference::ReplyError;

#[derive(Debug)]
pub enum Action {
    Submit(String),
    ReplyReceived(Result<Message, ReplyError>),
    Quit,
}

#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    /// Send this request (the whole transcript, oldest first) to the capability.
    RequestReply(Vec<Message>),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => {
            if text.trim().is_empty() {
                debug!("Ignoring empty submission");
                return Effect::None;
            }
            if app.is_halted() {
                warn!("Submission ignored: no reply capability for this session");
                return Effect::None;
            }
            if app.is_loading {
                debug!("Submission ignored: a reply is still outstanding");
                return Effect::None;
            }

            app.session.append(Message::user(text));
            app.is_loading = true;
            app.error = None;
            app.status_message = String::from("Waiting for reply...");

            let request = app.transcript().projection();
            info!("Turn started: requesting reply for {} messages", request.len());
            Effect::RequestReply(request)
        }
        Action::ReplyReceived(result) => {
            if !app.is_loading {
                warn!("Reply arrived with no turn outstanding, dropping it");
                return Effect::None;
            }
            app.is_loading = false;

            match result {
                Ok(reply) => {
                    // Always stored as assistant: the transcript alternates user/assistant.
                    let reply = match reply.role() {
                        Role::Assistant => reply,
                        Role::User => Message::assistant(reply.content()),
                    };
                    app.session.append(reply);
                    app.status_message = String::from("Ready");
                    info!("Turn complete: transcript has {} messages", app.transcript().len());
                }
                Err(e) => {
                    warn!("Turn abandoned: {}", e);
                    app.error = Some(format!("Reply failed: {e}"));
                    app.status_message = String::from("Reply failed");
                }
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ChatError;
    use crate::core::state::App;
    use crate::test_support::{test_app, test_session};

    #[test]
    fn test_submit_appends_user_and_requests_full_history() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("Hi".to_string()));

        assert_eq!(effect, Effect::RequestReply(vec![Message::user("Hi")]));
        assert_eq!(app.transcript().len(), 1);
        assert!(app.is_loading);
    }

    #[test]
    fn test_empty_submit_is_ignored() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Submit(String::new())), Effect::None);
        assert_eq!(update(&mut app, Action::Submit("  \n\t".to_string())), Effect::None);
        assert!(app.transcript().is_empty());
        assert!(!app.is_loading);
    }

    #[test]
    fn test_submit_while_loading_is_ignored() {
        let mut app = test_app();
        update(&mut app, Action::Submit("A".to_string()));
        let effect = update(&mut app, Action::Submit("B".to_string()));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.transcript().len(), 1);
    }

    #[test]
    fn test_submit_on_halted_app_never_appends() {
        let mut app = App::halted(
            test_session(),
            ChatError::UnsupportedModel("Claude".to_string()),
        );
        let effect = update(&mut app, Action::Submit("Hi".to_string()));
        assert_eq!(effect, Effect::None);
        assert!(app.transcript().is_empty());
    }

    #[test]
    fn test_reply_appends_assistant() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hi".to_string()));
        update(&mut app, Action::ReplyReceived(Ok(Message::assistant("Hello"))));

        let messages = app.transcript().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], Message::assistant("Hello"));
        assert!(!app.is_loading);
        assert!(app.error.is_none());
    }

    #[test]
    fn test_reply_tagged_as_user_is_stored_as_assistant() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hi".to_string()));
        update(&mut app, Action::ReplyReceived(Ok(Message::user("odd"))));
        assert_eq!(app.transcript().messages()[1].role(), Role::Assistant);
    }

    #[test]
    fn test_failed_reply_leaves_orphaned_user_turn() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hi".to_string()));
        update(
            &mut app,
            Action::ReplyReceived(Err(ReplyError::Network("down".to_string()))),
        );

        assert_eq!(app.transcript().len(), 1);
        assert_eq!(app.transcript().messages()[0], Message::user("Hi"));
        assert!(!app.is_loading);
        assert_eq!(app.error.as_deref(), Some("Reply failed: network error: down"));

        // Session stays usable
        let effect = update(&mut app, Action::Submit("again".to_string()));
        assert!(matches!(effect, Effect::RequestReply(ref r) if r.len() == 2));
        assert!(app.error.is_none());
    }

    #[test]
    fn test_stray_reply_is_dropped() {
        let mut app = test_app();
        update(&mut app, Action::ReplyReceived(Ok(Message::assistant("late"))));
        assert!(app.transcript().is_empty());
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
