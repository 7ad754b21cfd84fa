// ABOUTME: TUI state types — displayed messages, session list, input buffer, and busy flag.
// ABOUTME: Updated from worker snapshots; drives the TUI rendering.

use crate::chat::{ChatSnapshot, Notice, NoticeLevel};
use crate::session::{Role, SessionId, SessionSummary};

/// The kind of a single chat message displayed in the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatMessageKind {
    User,
    Assistant,
    System { is_error: bool },
}

/// A single message in the chat pane.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub kind: ChatMessageKind,
    pub content: String,
}

/// Full TUI application state.
pub struct TuiState {
    pub messages: Vec<ChatMessage>,
    pub sessions: Vec<SessionSummary>,
    pub active: Option<SessionId>,
    pub title: String,
    pub input: String,
    pub cursor_pos: usize,
    pub scroll_offset: u16,
    pub busy: bool,
    pub model: String,
    pub store_path: String,
}

impl TuiState {
    /// Create an empty state; the worker's first snapshot fills it in.
    pub fn new(model: String, store_path: String) -> Self {
        Self {
            messages: Vec::new(),
            sessions: Vec::new(),
            active: None,
            title: String::new(),
            input: String::new(),
            cursor_pos: 0,
            scroll_offset: 0,
            busy: true,
            model,
            store_path,
        }
    }

    /// Add a message to the chat pane and reset scroll to bottom.
    pub fn push_message(&mut self, kind: ChatMessageKind, content: String) {
        self.messages.push(ChatMessage { kind, content });
        self.scroll_offset = 0;
    }

    /// Replace the session list and conversation with a worker snapshot.
    ///
    /// Notices shown for the same session are kept; switching sessions clears them.
    pub fn apply_snapshot(&mut self, snapshot: ChatSnapshot) {
        let same_session = self.active.as_ref() == Some(&snapshot.active);
        let kept_notices: Vec<ChatMessage> = if same_session {
            self.messages
                .iter()
                .filter(|m| matches!(m.kind, ChatMessageKind::System { .. }))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        self.messages = snapshot
            .messages
            .into_iter()
            .map(|turn| ChatMessage {
                kind: match turn.role {
                    Role::User => ChatMessageKind::User,
                    Role::Assistant => ChatMessageKind::Assistant,
                },
                content: turn.content,
            })
            .collect();
        self.messages.extend(kept_notices);

        self.sessions = snapshot.sessions;
        self.active = Some(snapshot.active);
        self.title = snapshot.title;
        self.busy = false;
        self.scroll_offset = 0;
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.push_message(
            ChatMessageKind::System {
                is_error: notice.level == NoticeLevel::Error,
            },
            notice.message,
        );
    }

    /// Index of the active session in the sidebar list.
    pub fn active_index(&self) -> Option<usize> {
        let active = self.active.as_ref()?;
        self.sessions.iter().position(|s| &s.id == active)
    }

    /// The session `step` places away from the active one, wrapping around.
    pub fn neighbor_session(&self, step: isize) -> Option<SessionId> {
        let len = self.sessions.len() as isize;
        if len == 0 {
            return None;
        }
        let current = self.active_index().unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(len) as usize;
        Some(self.sessions[next].id.clone())
    }

    /// Submit the current input buffer. Returns the trimmed text if non-empty.
    pub fn submit_input(&mut self) -> Option<String> {
        let trimmed = self.input.trim().to_string();
        if trimmed.is_empty() {
            return None;
        }
        self.input.clear();
        self.cursor_pos = 0;
        Some(trimmed)
    }

    /// Clamp the cursor position to the valid character range of the input buffer.
    pub fn clamp_cursor(&mut self) {
        self.cursor_pos = self.cursor_pos.min(self.input_char_len());
    }

    /// Return the current cursor byte index in the UTF-8 input buffer.
    pub fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(&self.input, self.cursor_pos)
    }

    pub fn input_char_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Number of lines in the input buffer (at least one).
    pub fn input_line_count(&self) -> usize {
        self.input.split('\n').count()
    }

    /// Line and column (in characters) of the cursor within the input buffer.
    pub fn cursor_line_and_column(&self) -> (usize, usize) {
        let before: String = self.input.chars().take(self.cursor_pos).collect();
        let line = before.matches('\n').count();
        let column = before
            .rsplit('\n')
            .next()
            .map(|s| s.chars().count())
            .unwrap_or(0);
        (line, column)
    }

    /// Insert a character at the cursor and advance by one character.
    pub fn insert_char_at_cursor(&mut self, c: char) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.input.insert(byte_index, c);
        self.cursor_pos += 1;
    }

    /// Delete the character before the cursor.
    pub fn backspace_char(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos == 0 {
            return;
        }
        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(&self.input, self.cursor_pos - 1);
        self.input.replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    /// Delete the character at the cursor.
    pub fn delete_char_at_cursor(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos >= self.input_char_len() {
            return;
        }
        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(&self.input, self.cursor_pos + 1);
        self.input.replace_range(start..end, "");
    }

    pub fn move_cursor_left(&mut self) {
        self.clamp_cursor();
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos < self.input_char_len() {
            self.cursor_pos += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_pos = self.input_char_len();
    }
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}
