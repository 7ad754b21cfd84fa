// ABOUTME: Keyboard input handling for the TUI — translates key events into actions.
// ABOUTME: Handles typing, quick-action sample questions, session switching, and scrolling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::prompt::SAMPLE_QUESTIONS;
use crate::session::SessionId;
use crate::tui::state::TuiState;

/// The result of processing a key event.
#[derive(Debug, PartialEq)]
pub enum InputResult {
    /// No action needed.
    None,
    /// User submitted a message.
    Send(String),
    /// User asked for a new chat.
    NewSession,
    /// User switched to another session.
    SelectSession(SessionId),
    /// User wants to quit.
    Quit,
}

/// Process a key event against the current TUI state and return the resulting action.
pub fn handle_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Ctrl+C always quits
    if ctrl && key.code == KeyCode::Char('c') {
        return InputResult::Quit;
    }

    match key.code {
        KeyCode::PageUp => {
            state.scroll_offset = state.scroll_offset.saturating_add(10);
            return InputResult::None;
        }
        KeyCode::PageDown => {
            state.scroll_offset = state.scroll_offset.saturating_sub(10);
            return InputResult::None;
        }
        KeyCode::Up => {
            state.scroll_offset = state.scroll_offset.saturating_add(1);
            return InputResult::None;
        }
        KeyCode::Down => {
            state.scroll_offset = state.scroll_offset.saturating_sub(1);
            return InputResult::None;
        }
        KeyCode::Esc => return InputResult::Quit,
        _ => {}
    }

    // One request at a time: typing is allowed, actions wait.
    let action_allowed = !state.busy;

    match key.code {
        KeyCode::Char('n') if ctrl => {
            if action_allowed {
                state.busy = true;
                InputResult::NewSession
            } else {
                InputResult::None
            }
        }
        KeyCode::Tab | KeyCode::BackTab => {
            let step = if key.code == KeyCode::BackTab { -1 } else { 1 };
            match state.neighbor_session(step) {
                Some(id) if action_allowed && Some(&id) != state.active.as_ref() => {
                    state.busy = true;
                    InputResult::SelectSession(id)
                }
                _ => InputResult::None,
            }
        }
        KeyCode::F(n @ 1..=4) => {
            if action_allowed {
                let question = SAMPLE_QUESTIONS[usize::from(n) - 1].to_string();
                begin_send(state, question)
            } else {
                InputResult::None
            }
        }
        // Shift+Enter inserts a newline into the input buffer.
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
            state.insert_char_at_cursor('\n');
            InputResult::None
        }
        KeyCode::Enter => {
            if !action_allowed {
                return InputResult::None;
            }
            match state.submit_input() {
                Some(text) => begin_send(state, text),
                None => InputResult::None,
            }
        }
        KeyCode::Char(c) if !ctrl => {
            state.insert_char_at_cursor(c);
            InputResult::None
        }
        KeyCode::Backspace => {
            state.backspace_char();
            InputResult::None
        }
        KeyCode::Delete => {
            state.delete_char_at_cursor();
            InputResult::None
        }
        KeyCode::Left => {
            state.move_cursor_left();
            InputResult::None
        }
        KeyCode::Right => {
            state.move_cursor_right();
            InputResult::None
        }
        KeyCode::Home => {
            state.move_cursor_home();
            InputResult::None
        }
        KeyCode::End => {
            state.move_cursor_end();
            InputResult::None
        }
        _ => InputResult::None,
    }
}

/// Show the user's message right away and mark the UI busy until the reply arrives.
fn begin_send(state: &mut TuiState, text: String) -> InputResult {
    state.push_message(crate::tui::state::ChatMessageKind::User, text.clone());
    state.busy = true;
    InputResult::Send(text)
}
