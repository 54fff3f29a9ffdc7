//! # Chatbot Graph
//!
//! The conversation loop is conceptually a two-edge graph:
//!
//! ```text
//! START ──▶ chatbot ──▶ END
//! ```
//!
//! There is nothing to execute: `chatbot` is a direct call to the reply
//! capability in `core::conversation`. What remains here is the description of
//! that shape, so it can be drawn for the user (text boxes in the terminal) or
//! exported as mermaid source.

use thiserror::Error;
use unicode_width::UnicodeWidthStr;

pub const START: &str = "__start__";
pub const END: &str = "__end__";
/// Name of the single computational node.
pub const CHATBOT_NODE: &str = "chatbot";
/// Caption shown under the rendered diagram.
pub const GRAPH_CAPTION: &str = "Chatbot Graph";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiagramError {
    #[error("diagram needs {needed} columns, only {available} available")]
    TooNarrow { needed: u16, available: u16 },
}

/// Static shape of the chat graph. Nodes are listed in flow order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatGraph {
    nodes: Vec<&'static str>,
}

impl Default for ChatGraph {
    fn default() -> Self {
        Self::chatbot()
    }
}

impl ChatGraph {
    /// START → chatbot → END.
    pub fn chatbot() -> Self {
        Self {
            nodes: vec![START, CHATBOT_NODE, END],
        }
    }

    pub fn nodes(&self) -> &[&'static str] {
        &self.nodes
    }

    /// `(from, to)` pairs in flow order.
    pub fn edges(&self) -> Vec<(&'static str, &'static str)> {
        self.nodes.windows(2).map(|w| (w[0], w[1])).collect()
    }

    /// Mermaid flowchart source for the graph.
    pub fn to_mermaid(&self) -> String {
        let mut diagram = String::from("flowchart TD\n");
        for node in &self.nodes {
            match *node {
                START => diagram.push_str(&format!("    {START}([Start])\n")),
                END => diagram.push_str(&format!("    {END}([End])\n")),
                name => diagram.push_str(&format!("    {name}[{name}]\n")),
            }
        }
        for (from, to) in self.edges() {
            diagram.push_str(&format!("    {from} --> {to}\n"));
        }
        diagram.push_str("    classDef startEnd fill:#e1f5e1,stroke:#4caf50\n");
        diagram.push_str(&format!("    class {START},{END} startEnd\n"));
        diagram
    }
}

/// Display label for a node (the markers get friendlier names).
fn node_label(node: &str) -> &str {
    match node {
        START => "START",
        END => "END",
        other => other,
    }
}

/// A drawn graph ready for a display layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    pub caption: String,
    pub lines: Vec<String>,
}

impl Diagram {
    pub fn width(&self) -> u16 {
        self.lines
            .iter()
            .map(|l| l.width() as u16)
            .max()
            .unwrap_or(0)
    }

    pub fn height(&self) -> u16 {
        self.lines.len() as u16
    }
}

/// Something that can turn the graph into a `Diagram`.
pub trait DiagramRenderer {
    fn render(&self, graph: &ChatGraph) -> Result<Diagram, DiagramError>;
}

/// Draws nodes as boxes stacked top to bottom with arrows between them,
/// centred in at most `max_width` columns.
pub struct TextDiagramRenderer {
    pub max_width: u16,
}

impl TextDiagramRenderer {
    pub fn new(max_width: u16) -> Self {
        Self { max_width }
    }
}

impl DiagramRenderer for TextDiagramRenderer {
    fn render(&self, graph: &ChatGraph) -> Result<Diagram, DiagramError> {
        // Box = border + space + label + space + border
        let box_width = |node: &str| node_label(node).width() + 4;
        let total = graph.nodes().iter().map(|n| box_width(n)).max().unwrap_or(0);

        if total as u16 > self.max_width {
            return Err(DiagramError::TooNarrow {
                needed: total as u16,
                available: self.max_width,
            });
        }

        let center = " ".repeat(total / 2);
        let mut lines = Vec::new();
        for (i, node) in graph.nodes().iter().enumerate() {
            if i > 0 {
                lines.push(format!("{center}│"));
                lines.push(format!("{center}▼"));
            }
            let label = node_label(node);
            let inner = label.width() + 2;
            let pad = " ".repeat((total - box_width(node)) / 2);
            lines.push(format!("{pad}┌{}┐", "─".repeat(inner)));
            lines.push(format!("{pad}│ {label} │"));
            lines.push(format!("{pad}└{}┘", "─".repeat(inner)));
        }

        Ok(Diagram {
            caption: GRAPH_CAPTION.to_string(),
            lines,
        })
    }
}
