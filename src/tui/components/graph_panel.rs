//! # GraphPanel Component
//!
//! Shows the chatbot graph diagram above the conversation, captioned, or the
//! notice explaining why it could not be drawn. Either way it never blocks
//! the chat below it.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::core::error::ChatError;
use crate::core::graph::Diagram;
use crate::tui::component::Component;

pub struct GraphPanel<'a> {
    pub diagram: &'a Result<Diagram, ChatError>,
}

impl<'a> GraphPanel<'a> {
    pub fn new(diagram: &'a Result<Diagram, ChatError>) -> Self {
        Self { diagram }
    }

    /// Rows wanted, borders included.
    pub fn height(&self) -> u16 {
        match self.diagram {
            Ok(diagram) => diagram.height() + 2,
            Err(_) => 1,
        }
    }
}

impl Component for GraphPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        match self.diagram {
            Ok(diagram) => {
                let lines: Vec<Line> = diagram.lines.iter().map(|l| Line::from(l.as_str())).collect();
                let block = Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title_bottom(
                        Line::from(diagram.caption.as_str())
                            .style(Style::default().add_modifier(Modifier::ITALIC))
                            .centered(),
                    );
                let paragraph = Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .block(block);
                frame.render_widget(paragraph, area);
            }
            Err(e) => {
                let notice = Paragraph::new(e.to_string())
                    .style(Style::default().fg(Color::Yellow))
                    .wrap(Wrap { trim: true });
                frame.render_widget(notice, area);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::{ChatGraph, DiagramError, DiagramRenderer, TextDiagramRenderer};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(panel: &mut GraphPanel<'_>, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| panel.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_diagram_panel_shows_nodes_and_caption() {
        let diagram = TextDiagramRenderer::new(40).render(&ChatGraph::chatbot());
        let diagram = diagram.map_err(ChatError::from);
        let mut panel = GraphPanel::new(&diagram);
        let height = panel.height();
        assert_eq!(height, 15);

        let text = screen(&mut panel, 40, height);
        assert!(text.contains("START"));
        assert!(text.contains("chatbot"));
        assert!(text.contains("END"));
        assert!(text.contains("Chatbot Graph"));
    }

    #[test]
    fn test_failed_diagram_is_one_line_notice() {
        let failed: Result<Diagram, ChatError> = Err(ChatError::Diagram(DiagramError::TooNarrow {
            needed: 11,
            available: 4,
        }));
        let mut panel = GraphPanel::new(&failed);
        assert_eq!(panel.height(), 1);

        let text = screen(&mut panel, 80, 1);
        assert!(text.contains("Failed to display graph"));
    }
}
