//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm, apart from
//! the plain line-mode loop in `repl`.
//!
//! ## Redraw Strategy
//!
//! - **Waiting for a reply**: polls every ~100ms so the reply shows up promptly.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.
//!
//! Replies are requested on a spawned tokio task and come back through an
//! `mpsc` channel as `Action::ReplyReceived`, so the terminal keeps redrawing
//! while one turn is pending. The core refuses a second submission until then.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::conversation::{ChatView, show_graph};
use crate::core::graph::{ChatGraph, Diagram, TextDiagramRenderer};
use crate::core::state::App;
use crate::core::transcript::Message;
use crate::inference::ReplyCapability;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

pub const APP_TITLE: &str = "parley";

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    /// Graph panel visibility, toggled with Ctrl+G
    pub show_diagram: bool,
}

impl TuiState {
    pub fn new(show_diagram: bool) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            show_diagram,
        }
    }
}

/// The graph panel draws `App::diagram` itself; this only logs what
/// `show_graph` reports.
struct PanelLog;

impl ChatView for PanelLog {
    fn show_message(&mut self, _message: &Message) {}

    fn show_diagram(&mut self, diagram: &Diagram) {
        debug!("Graph panel holds {}x{} diagram", diagram.width(), diagram.height());
    }

    fn show_error(&mut self, error: &str) {
        debug!("Graph panel notice: {}", error);
    }
}

fn render_diagram(app: &mut App, width: u16) {
    app.diagram = Some(show_graph(
        &ChatGraph::chatbot(),
        &TextDiagramRenderer::new(width),
        &mut PanelLog,
    ));
}

/// Redraws the diagram for a new terminal width while the panel is shown.
/// A wider terminal may now fit a diagram that failed before.
fn on_resize(app: &mut App, tui: &TuiState, width: u16) {
    if tui.show_diagram {
        render_diagram(app, width);
    }
}

/// Ctrl+G. Showing the panel draws the diagram unless a good one is cached.
fn toggle_diagram(app: &mut App, tui: &mut TuiState, width: u16) {
    tui.show_diagram = !tui.show_diagram;
    if tui.show_diagram && !matches!(app.diagram, Some(Ok(_))) {
        render_diagram(app, width);
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: draw() resets the blink timer
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Runs the full-screen chat until the user quits.
///
/// Must be called from within a tokio runtime.
pub fn run(mut app: App, show_diagram: bool) -> std::io::Result<()> {
    let mut tui = TuiState::new(show_diagram);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    if show_diagram {
        render_diagram(&mut app, terminal.size()?.width);
    }

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = if app.is_loading {
            Duration::from_millis(100)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                TuiEvent::Quit => {
                    if update(&mut app, Action::Quit) == Effect::Quit {
                        break 'main;
                    }
                }
                TuiEvent::Resize => on_resize(&mut app, &tui, terminal.size()?.width),
                TuiEvent::ToggleDiagram => {
                    toggle_diagram(&mut app, &mut tui, terminal.size()?.width)
                }
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToBottom => {
                    tui.message_list.handle_event(&event);
                }
                _ => {
                    if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&event) {
                        tui.message_list.stick_to_bottom = true;
                        if let Effect::RequestReply(request) = update(&mut app, Action::Submit(text))
                        {
                            spawn_reply(&app, request, tx.clone());
                        }
                    }
                }
            }
        }

        // Replies from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            update(&mut app, action);
        }
    }

    info!(
        "Session {} ended with {} messages",
        app.session.id,
        app.transcript().len()
    );
    ratatui::restore();
    Ok(())
}

fn spawn_reply(app: &App, request: Vec<Message>, tx: mpsc::Sender<Action>) {
    let Some(capability) = app.capability.clone() else {
        // update() never requests a reply for a halted session
        warn!("Reply requested without a capability");
        return;
    };
    info!(
        "Spawning reply request ({} messages, model={})",
        request.len(),
        capability.model_name()
    );
    tokio::spawn(async move {
        let result = capability.reply(&request).await;
        if tx.send(Action::ReplyReceived(result)).is_err() {
            warn!("Failed to send reply: receiver dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    #[test]
    fn test_toggle_on_narrow_terminal_shows_notice() {
        let mut app = test_app();
        let mut tui = TuiState::new(false);

        toggle_diagram(&mut app, &mut tui, 4);

        assert!(tui.show_diagram);
        assert!(matches!(app.diagram, Some(Err(_))));
    }

    #[test]
    fn test_resize_recovers_diagram_after_toggle() {
        let mut app = test_app();
        let mut tui = TuiState::new(false);
        toggle_diagram(&mut app, &mut tui, 4);

        on_resize(&mut app, &tui, 80);

        assert!(matches!(app.diagram, Some(Ok(_))));
    }

    #[test]
    fn test_toggle_retries_failed_diagram() {
        let mut app = test_app();
        let mut tui = TuiState::new(true);
        render_diagram(&mut app, 4);

        toggle_diagram(&mut app, &mut tui, 80); // hide
        toggle_diagram(&mut app, &mut tui, 80); // show again, wider

        assert!(tui.show_diagram);
        assert!(matches!(app.diagram, Some(Ok(_))));
    }

    #[test]
    fn test_resize_while_hidden_leaves_diagram_alone() {
        let mut app = test_app();
        let tui = TuiState::new(false);

        on_resize(&mut app, &tui, 80);

        assert!(app.diagram.is_none());
    }
}
