//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: Top status bar showing model name and status
//! - `MessageView`: Single transcript message
//! - `GraphPanel`: Chatbot graph diagram, or why it could not be drawn
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `InputBox`: Text input field
//! - `MessageList`: Scrollable conversation view
//!
//! Components receive external data as props (struct fields), never by
//! reaching into `App` themselves.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs     (Top status bar)
//! ├── message.rs       (Single message renderer)
//! ├── message_list.rs  (Scrollable message container)
//! ├── graph_panel.rs   (Graph diagram)
//! └── input_box.rs     (Text input)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod graph_panel;
pub mod input_box;
pub mod message;
pub mod message_list;
pub use graph_panel::GraphPanel;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
