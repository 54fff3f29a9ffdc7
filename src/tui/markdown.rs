//! Markdown → ratatui `Text`.
//!
//! Replies from chat models are usually markdown. This covers what shows up
//! in practice: paragraphs, headings, emphasis, inline code, fenced code
//! blocks, lists and block quotes. Anything else renders as its plain text.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

const CODE_STYLE: Style = Style::new().fg(Color::White).bg(Color::DarkGray);
const GUTTER_STYLE: Style = Style::new().fg(Color::DarkGray);

/// Parse `content` into styled, owned `Text` with `base_fg` as the text colour.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut builder = MarkdownLines::new(base_fg);
    for event in Parser::new_ext(content, Options::ENABLE_STRIKETHROUGH) {
        builder.feed(event);
    }
    Text::from(builder.lines)
}

struct MarkdownLines {
    lines: Vec<Line<'static>>,
    base: Style,
    /// Inline modifiers currently open (bold inside italic etc.)
    inline: Vec<Style>,
    /// Stack of open lists: None = bullets, Some(n) = next ordinal.
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    in_code_block: bool,
    /// A blank separator line is owed before the next block.
    gap: bool,
}

impl MarkdownLines {
    fn new(base_fg: Color) -> Self {
        Self {
            lines: Vec::new(),
            base: Style::default().fg(base_fg),
            inline: Vec::new(),
            lists: Vec::new(),
            quote_depth: 0,
            in_code_block: false,
            gap: false,
        }
    }

    fn current_style(&self) -> Style {
        self.inline
            .iter()
            .fold(self.base, |style, overlay| style.patch(*overlay))
    }

    /// Starts a fresh line, carrying block-quote gutters.
    fn new_line(&mut self) {
        let mut line = Line::default();
        for _ in 0..self.quote_depth {
            line.push_span(Span::styled("│ ", GUTTER_STYLE));
        }
        self.lines.push(line);
    }

    fn begin_block(&mut self) {
        if self.gap && !self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.gap = false;
        self.new_line();
    }

    fn push(&mut self, span: Span<'static>) {
        if self.lines.is_empty() {
            self.new_line();
        }
        if let Some(line) = self.lines.last_mut() {
            line.push_span(span);
        }
    }

    fn feed(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.push(Span::styled(code.to_string(), CODE_STYLE)),
            Event::SoftBreak => self.push(Span::raw(" ")),
            Event::HardBreak => self.new_line(),
            Event::Rule => {
                self.begin_block();
                self.push(Span::styled("─".repeat(32), GUTTER_STYLE));
                self.gap = true;
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            // List items already opened a line for their marker
            Tag::Paragraph if !self.lists.is_empty() => {}
            Tag::Paragraph => self.begin_block(),
            Tag::Heading { level, .. } => {
                self.begin_block();
                let hashes = "#".repeat(heading_depth(level));
                let style = heading_overlay(level);
                self.push(Span::styled(format!("{hashes} "), self.base.patch(style)));
                self.inline.push(style);
            }
            Tag::CodeBlock(_) => {
                self.begin_block();
                self.push(Span::styled("╭──", GUTTER_STYLE));
                self.in_code_block = true;
            }
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.begin_block();
                    // begin_block opened an empty line; items open their own
                    self.lines.pop();
                }
                self.lists.push(first);
            }
            Tag::Item => {
                self.new_line();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{indent}{n}. ");
                        *n += 1;
                        m
                    }
                    _ => format!("{indent}• "),
                };
                self.push(Span::styled(marker, GUTTER_STYLE));
            }
            Tag::BlockQuote(_) => {
                self.quote_depth += 1;
                self.inline.push(Style::new().add_modifier(Modifier::ITALIC));
            }
            Tag::Emphasis => self.inline.push(Style::new().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.inline.push(Style::new().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => self
                .inline
                .push(Style::new().add_modifier(Modifier::CROSSED_OUT)),
            Tag::Link { .. } => self
                .inline
                .push(Style::new().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.gap = true,
            TagEnd::Heading(_) => {
                self.inline.pop();
                self.gap = true;
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.new_line();
                self.push(Span::styled("╰──", GUTTER_STYLE));
                self.gap = true;
            }
            TagEnd::List(_) => {
                self.lists.pop();
                self.gap = true;
            }
            TagEnd::BlockQuote(_) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.inline.pop();
                self.gap = true;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.inline.pop();
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        // ratatui draws \t as zero-width
        let text = text.replace('\t', "    ");
        if self.in_code_block {
            for code_line in text.lines() {
                self.new_line();
                self.push(Span::styled("│ ", GUTTER_STYLE));
                self.push(Span::styled(code_line.to_owned(), Style::new().fg(Color::White)));
            }
            return;
        }
        let style = self.current_style();
        self.push(Span::styled(text, style));
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn heading_overlay(level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::new().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => Style::new().add_modifier(Modifier::BOLD),
        _ => Style::new().add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}
