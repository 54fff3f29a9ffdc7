use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parley::core::config::{ParleyConfig, resolve};
use parley::core::conversation::{ChatView, TurnOutcome, handle_user_input, render_transcript};
use parley::core::error::ChatError;
use parley::core::graph::Diagram;
use parley::core::session::{ChatSession, MESSAGES_KEY, MemoryStore, SessionStore};
use parley::core::state::App;
use parley::core::transcript::{Message, Role};
use parley::inference::{
    ModelChoice, OPENAI_CHATGPT, ReplyCapability, ReplyError, select_reply_capability,
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Answers every request with `reply`, or fails on the listed (1-based) calls.
struct Canned {
    reply: String,
    fail_on: Vec<usize>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl Canned {
    fn new(reply: &str) -> Arc<Self> {
        Self::failing(reply, vec![])
    }

    fn failing(reply: &str, fail_on: Vec<usize>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            fail_on,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ReplyCapability for Canned {
    fn model_name(&self) -> &str {
        "canned"
    }

    async fn reply(&self, request: &[Message]) -> Result<Message, ReplyError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.to_vec());
            requests.len()
        };
        if self.fail_on.contains(&call) {
            Err(ReplyError::Network("connection reset".to_string()))
        } else {
            Ok(Message::assistant(self.reply.clone()))
        }
    }
}

#[derive(Default)]
struct Screen {
    shown: Vec<Message>,
    errors: Vec<String>,
}

impl ChatView for Screen {
    fn show_message(&mut self, message: &Message) {
        self.shown.push(message.clone());
    }

    fn show_diagram(&mut self, _diagram: &Diagram) {}

    fn show_error(&mut self, error: &str) {
        self.errors.push(error.to_string());
    }
}

fn app_with(capability: Arc<Canned>) -> App {
    App::new(ChatSession::in_memory(OPENAI_CHATGPT), capability)
}

// ============================================================================
// Turn Properties
// ============================================================================

#[tokio::test]
async fn test_n_turns_alternate_starting_with_user() {
    let capability = Canned::new("ok");
    let mut app = app_with(capability.clone());
    let mut screen = Screen::default();

    for i in 0..4 {
        handle_user_input(&mut app, &format!("question {i}"), &mut screen).await;
    }

    let messages = app.transcript().messages();
    assert_eq!(messages.len(), 8);
    for (i, message) in messages.iter().enumerate() {
        let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
        assert_eq!(message.role(), expected);
    }
}

#[tokio::test]
async fn test_every_request_is_the_full_history() {
    let capability = Canned::new("ok");
    let mut app = app_with(capability.clone());
    let mut screen = Screen::default();

    handle_user_input(&mut app, "A", &mut screen).await;
    handle_user_input(&mut app, "B", &mut screen).await;

    let requests = capability.requests();
    assert_eq!(requests[0], vec![Message::user("A")]);
    assert_eq!(
        requests[1],
        vec![Message::user("A"), Message::assistant("ok"), Message::user("B")]
    );
}

#[tokio::test]
async fn test_failure_on_turn_k_leaves_orphaned_user_message() {
    let capability = Canned::failing("ok", vec![3]);
    let mut app = app_with(capability.clone());
    let mut screen = Screen::default();

    for text in ["one", "two"] {
        handle_user_input(&mut app, text, &mut screen).await;
    }
    let outcome = handle_user_input(&mut app, "three", &mut screen).await;

    assert!(matches!(outcome, TurnOutcome::Failed(ReplyError::Network(_))));
    // 2(k-1) + 1 with k = 3
    assert_eq!(app.transcript().len(), 5);
    assert_eq!(app.transcript().last(), Some(&Message::user("three")));
    assert_eq!(
        screen.errors,
        vec!["Reply failed: network error: connection reset".to_string()]
    );

    // Still usable; the next request includes the orphaned turn
    let outcome = handle_user_input(&mut app, "four", &mut screen).await;
    assert_eq!(outcome, TurnOutcome::Answered(Message::assistant("ok")));
    let last_request = capability.requests().pop().unwrap_or_default();
    assert_eq!(last_request.len(), 6);
    assert_eq!(last_request[4], Message::user("three"));
}

#[tokio::test]
async fn test_empty_input_is_a_no_op() {
    let capability = Canned::new("ok");
    let mut app = app_with(capability.clone());
    let mut screen = Screen::default();

    let outcome = handle_user_input(&mut app, "", &mut screen).await;

    assert_eq!(outcome, TurnOutcome::Ignored);
    assert!(app.transcript().is_empty());
    assert!(capability.requests().is_empty());
    assert!(screen.shown.is_empty());
}

#[tokio::test]
async fn test_user_message_is_shown_before_reply() {
    let mut app = app_with(Canned::new("Hello!"));
    let mut screen = Screen::default();

    handle_user_input(&mut app, "Hi", &mut screen).await;

    assert_eq!(
        screen.shown,
        vec![Message::user("Hi"), Message::assistant("Hello!")]
    );
}

// ============================================================================
// Model Choice
// ============================================================================

#[tokio::test]
async fn test_unregistered_choice_never_appends() {
    let config = resolve(&ParleyConfig::default(), Some("Anthropic Claude"));
    let session = ChatSession::in_memory(&config.model_choice);

    let err = match select_reply_capability(session.model_choice(), &config) {
        Err(e) => e,
        Ok(_) => panic!("expected unsupported model"),
    };
    assert_eq!(err, ChatError::UnsupportedModel("Anthropic Claude".to_string()));
    assert_eq!(err.to_string(), "Unsupported model: Anthropic Claude");

    let mut app = App::halted(session, err);
    let mut screen = Screen::default();
    for text in ["Hi", "anyone?"] {
        let outcome = handle_user_input(&mut app, text, &mut screen).await;
        assert_eq!(outcome, TurnOutcome::Ignored);
    }
    assert!(app.transcript().is_empty());
}

#[test]
fn test_registered_choice_selects_openai() {
    let config = resolve(&ParleyConfig::default(), Some(OPENAI_CHATGPT));
    let capability = tokio_test::assert_ok!(select_reply_capability(&ModelChoice::OpenAi, &config));
    assert_eq!(capability.model_name(), config.openai_model);
}

// ============================================================================
// Rendering and Persistence
// ============================================================================

#[tokio::test]
async fn test_render_transcript_is_read_only() {
    let mut app = app_with(Canned::new("ok"));
    let mut screen = Screen::default();
    handle_user_input(&mut app, "A", &mut screen).await;

    let before = app.transcript().clone();
    let mut first = Screen::default();
    let mut second = Screen::default();
    render_transcript(app.transcript(), &mut first);
    render_transcript(app.transcript(), &mut second);

    assert_eq!(first.shown, second.shown);
    assert_eq!(first.shown, before.messages());
    assert_eq!(app.transcript(), &before);
}

#[tokio::test]
async fn test_transcript_survives_reopening_the_store() {
    let mut app = app_with(Canned::new("ok"));
    let mut screen = Screen::default();
    handle_user_input(&mut app, "Hi", &mut screen).await;

    let store = app.session.into_store();
    assert!(store.get(MESSAGES_KEY).is_some());

    let reopened = ChatSession::open(store, "ignored default");
    assert_eq!(
        reopened.transcript().messages(),
        &[Message::user("Hi"), Message::assistant("ok")]
    );
    assert_eq!(reopened.model_choice(), &ModelChoice::OpenAi);
}

#[test]
fn test_fresh_store_starts_empty() {
    let session = ChatSession::open(Box::new(MemoryStore::new()), OPENAI_CHATGPT);
    assert!(session.transcript().is_empty());
}
