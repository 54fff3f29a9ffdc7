//! # Plain Front End
//!
//! Line-oriented chat on stdin/stdout for terminals (or pipes) where the
//! full-screen TUI is unwanted. Each non-empty line is one turn; EOF or
//! `/quit` ends the session.

use std::io::{self, Write};

use crossterm::style::Stylize;
use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::core::conversation::{ChatView, handle_user_input, render_transcript, show_graph};
use crate::core::graph::{ChatGraph, Diagram, TextDiagramRenderer};
use crate::core::state::App;
use crate::core::transcript::{Message, Role};

/// Columns offered to the diagram renderer when stdout isn't a terminal.
const FALLBACK_WIDTH: u16 = 80;

pub const PROMPT: &str = "What would you like to ask? ";

/// Writes styled output to any `Write` sink.
pub struct PlainView<W: Write> {
    out: W,
}

impl<W: Write> PlainView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChatView for PlainView<W> {
    fn show_message(&mut self, message: &Message) {
        let label = match message.role() {
            Role::User => message.role().label().green().bold(),
            Role::Assistant => message.role().label().blue().bold(),
        };
        let _ = writeln!(self.out, "{label}: {}", message.content().trim());
    }

    fn show_diagram(&mut self, diagram: &Diagram) {
        for line in &diagram.lines {
            let _ = writeln!(self.out, "{line}");
        }
        let _ = writeln!(self.out, "{}", diagram.caption.as_str().dark_grey().italic());
    }

    fn show_error(&mut self, error: &str) {
        let _ = writeln!(self.out, "{}", error.red());
    }
}

pub async fn run(mut app: App, show_diagram: bool) -> io::Result<()> {
    let mut view = PlainView::new(io::stdout());
    let _ = writeln!(view.out, "{}", crate::tui::APP_TITLE.bold());

    if let Some(err) = app.error.clone() {
        // Halted before any turn (unsupported model)
        view.show_error(&err);
        return Ok(());
    }

    if show_diagram {
        let width = crossterm::terminal::size()
            .map(|(w, _)| w)
            .unwrap_or(FALLBACK_WIDTH);
        app.diagram = Some(show_graph(
            &ChatGraph::chatbot(),
            &TextDiagramRenderer::new(width),
            &mut view,
        ));
    }

    render_transcript(app.transcript(), &mut view);

    chat_loop(&mut app, BufReader::new(tokio::io::stdin()), &mut view).await?;

    info!(
        "Plain session {} ended with {} messages",
        app.session.id,
        app.transcript().len()
    );
    Ok(())
}

/// Runs turns for each input line until EOF or `/quit`.
///
/// A line that is not valid UTF-8 is reported and skipped; only a failing
/// reader ends the loop early.
async fn chat_loop<R, W>(app: &mut App, input: R, view: &mut PlainView<W>) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.split(b'\n');
    loop {
        let _ = write!(view.out, "{}", PROMPT.dark_grey());
        let _ = view.out.flush();

        let Some(raw) = lines.next_segment().await? else {
            break;
        };
        let line = match String::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                warn!("Skipping input line: {}", e);
                view.show_error("Input is not valid UTF-8, line ignored");
                continue;
            }
        };
        let line = line.trim_end_matches('\r');
        if line.trim() == "/quit" {
            break;
        }
        handle_user_input(app, line, view).await;
    }
    Ok(())
}
