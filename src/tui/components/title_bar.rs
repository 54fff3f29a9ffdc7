//! # TitleBar Component
//!
//! Top status bar: application title, model name, status text, and a
//! "↓ New" marker when the conversation has content below the viewport.
//!
//! Stateless: every field is a prop supplied by the parent each frame.
//!
//! Formatting priority, most to least information:
//!
//! 1. `"parley (model: gpt-4o-mini) | Waiting for reply... | ↓ New"`
//! 2. `"parley (model: gpt-4o-mini) | Waiting for reply..."`
//! 3. `"parley (model: gpt-4o-mini)"`

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::tui::component::Component;

pub struct TitleBar<'a> {
    pub title: &'a str,
    pub model_name: &'a str,
    pub status_message: &'a str,
    pub has_unseen_content: bool,
}

impl<'a> TitleBar<'a> {
    pub fn new(
        title: &'a str,
        model_name: &'a str,
        status_message: &'a str,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            title,
            model_name,
            status_message,
            has_unseen_content,
        }
    }

    fn text(&self) -> String {
        let mut text = format!("{} (model: {})", self.title, self.model_name);
        if !self.status_message.is_empty() {
            text.push_str(" | ");
            text.push_str(self.status_message);
        }
        if self.has_unseen_content {
            text.push_str(" | ↓ New");
        }
        text
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let span = Span::styled(self.text(), Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(span, area);
    }
}
