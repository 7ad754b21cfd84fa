// ABOUTME: Chat widget — renders chat messages into styled ratatui Lines.
// ABOUTME: User, assistant, and system notices each get distinct visual styling.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::state::{ChatMessage, ChatMessageKind};

/// Render a slice of chat messages into styled Lines for display.
pub fn render_chat_lines(messages: &[ChatMessage]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, msg) in messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }

        match &msg.kind {
            ChatMessageKind::User => {
                push_prefixed(&mut lines, "❯ ", Color::Green, &msg.content);
            }
            ChatMessageKind::Assistant => {
                push_prefixed(&mut lines, "🎓 ", Color::Cyan, &msg.content);
            }
            ChatMessageKind::System { is_error } => {
                let color = if *is_error { Color::Red } else { Color::Yellow };
                lines.push(Line::from(Span::styled(
                    format!("[notice] {}", msg.content),
                    Style::default().fg(color).add_modifier(Modifier::ITALIC),
                )));
            }
        }
    }

    lines
}

/// First line gets the styled prefix, continuation lines are indented plain text.
fn push_prefixed(lines: &mut Vec<Line<'static>>, prefix: &'static str, color: Color, content: &str) {
    for (i, text) in content.split('\n').enumerate() {
        if i == 0 {
            lines.push(Line::from(vec![
                Span::styled(
                    prefix,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(text.to_string()),
            ]));
        } else {
            lines.push(Line::from(Span::raw(format!("  {}", text))));
        }
    }
}
