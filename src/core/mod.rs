//! # Core Application Logic
//!
//! This module contains parley's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Transcript + Session │
//!                    │  • Action / update()    │
//!                    │  • handle_user_input    │
//!                    │                         │
//!                    └───────────┬─────────────┘
//!                                │ ChatView
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │    REPL    │
//!             │ (ratatui)  │          │  (stdout)  │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`transcript`]: `Message`, `Role` and the append-only `Transcript`
//! - [`session`]: `ChatSession`, the per-session context over a `SessionStore`
//! - [`state`]: the `App` struct, all application state in one place
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`conversation`]: one full turn against a `ChatView`
//! - [`graph`]: the chatbot graph description and its diagram

pub mod action;
pub mod config;
pub mod conversation;
pub mod error;
pub mod graph;
pub mod session;
pub mod state;
pub mod transcript;
