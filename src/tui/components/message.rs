use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::transcript::{Message, Role};
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
pub const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
pub const VERTICAL_OVERHEAD: u16 = 2;

/// One transcript message, pre-rendered from markdown.
///
/// Built once per frame by the message list; holds owned text so height
/// measurement and drawing use the exact same lines.
#[derive(Debug, Clone)]
pub struct MessageView {
    role: Role,
    body: Text<'static>,
}

pub fn role_color(role: Role) -> Color {
    match role {
        Role::User => Color::Green,
        Role::Assistant => Color::Blue,
    }
}

impl MessageView {
    pub fn new(message: &Message) -> Self {
        let role = message.role();
        Self {
            role,
            body: markdown::render(message.content().trim(), role_color(role)),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    fn paragraph(&self) -> Paragraph<'_> {
        Paragraph::new(self.body.clone()).wrap(Wrap { trim: false })
    }

    /// Rows this message occupies at `width`, borders included.
    pub fn height(&self, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Too narrow for borders + padding; still take a row
            return 1;
        }
        if self.body.lines.is_empty() {
            return VERTICAL_OVERHEAD;
        }
        let lines = self.paragraph().line_count(content_width) as u16;
        lines.max(1) + VERTICAL_OVERHEAD
    }
}

impl Widget for &MessageView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = Style::default()
            .fg(role_color(self.role))
            .add_modifier(Modifier::DIM);

        let block = Block::bordered()
            .title(self.role.label())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(area);
        block.render(area, buf);
        self.paragraph().render(inner, buf);
    }
}
