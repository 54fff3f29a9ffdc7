//! # MessageList Component
//!
//! Scrollable view of the transcript.
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the `Transcript` (props).
//! Each frame it replays the transcript through `render_transcript` into a
//! `MessageViews` collector, measures every message, and draws them into a
//! `ScrollView`. Replaying is read-only, so redrawing any number of times
//! leaves the transcript untouched.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::conversation::{ChatView, render_transcript};
use crate::core::graph::Diagram;
use crate::core::transcript::{Message, Transcript};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageView;
use crate::tui::event::TuiEvent;

/// Rows moved per scroll-wheel notch / arrow press.
const SCROLL_STEP: u16 = 3;

/// Collects the transcript as pre-rendered message views.
#[derive(Default)]
pub struct MessageViews {
    pub views: Vec<MessageView>,
}

impl ChatView for MessageViews {
    fn show_message(&mut self, message: &Message) {
        self.views.push(MessageView::new(message));
    }

    // The list only shows messages; diagrams and errors have their own panels.
    fn show_diagram(&mut self, _diagram: &Diagram) {}

    fn show_error(&mut self, _error: &str) {}
}

/// Scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Heights from the last render, used to clamp scrolling between frames
    pub content_height: u16,
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            content_height: 0,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    fn offset(&self) -> u16 {
        self.scroll_state.offset().y.min(self.max_offset())
    }

    fn set_offset(&mut self, y: u16) {
        let y = y.min(self.max_offset());
        self.scroll_state.set_offset(Position { x: 0, y });
        self.stick_to_bottom = y >= self.max_offset();
    }

    /// Whether content exists below the viewport.
    pub fn has_unseen_content(&self) -> bool {
        self.offset() < self.max_offset()
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        let page = self.viewport_height.max(1);
        match event {
            TuiEvent::ScrollUp => self.set_offset(self.offset().saturating_sub(SCROLL_STEP)),
            TuiEvent::ScrollDown => self.set_offset(self.offset().saturating_add(SCROLL_STEP)),
            TuiEvent::ScrollPageUp => self.set_offset(self.offset().saturating_sub(page)),
            TuiEvent::ScrollPageDown => self.set_offset(self.offset().saturating_add(page)),
            TuiEvent::ScrollToBottom => self.set_offset(u16::MAX),
            _ => return None,
        }
        Some(())
    }
}

pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub transcript: &'a Transcript,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, transcript: &'a Transcript) -> Self {
        Self { state, transcript }
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar

        let mut collector = MessageViews::default();
        render_transcript(self.transcript, &mut collector);

        let heights: Vec<u16> = collector
            .views
            .iter()
            .map(|v| v.height(content_width))
            .collect();
        let total_height = heights.iter().fold(0u16, |acc, h| acc.saturating_add(*h));

        self.state.content_height = total_height;
        self.state.viewport_height = area.height;

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y = 0u16;
        for (view, height) in collector.views.iter().zip(&heights) {
            scroll_view.render_widget(view, Rect::new(0, y, content_width, *height));
            y = y.saturating_add(*height);
        }

        // Pin or clamp against the freshly measured content
        let y = if self.state.stick_to_bottom {
            self.state.max_offset()
        } else {
            self.state.offset()
        };
        self.state.scroll_state.set_offset(Position { x: 0, y });

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
