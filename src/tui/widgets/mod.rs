// ABOUTME: TUI widget sub-modules for chat, session sidebar, and status/quick-action rows.
// ABOUTME: Each widget is a pure rendering function over plain data.

pub mod chat;
pub mod sessions;
pub mod status;
