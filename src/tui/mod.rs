// ABOUTME: TUI module — ratatui full-screen interface for unibot.
// ABOUTME: Session sidebar, chat display, quick actions, input handling, and status bar.

pub mod input;
pub mod state;
pub mod ui;
pub mod widgets;

pub use state::*;
