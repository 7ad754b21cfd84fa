// ABOUTME: Session sidebar widget — lists chats newest first with the active one highlighted.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::session::{SessionId, SessionSummary};

/// Render the session list. Titles are cut to `width` characters.
pub fn session_lines(
    sessions: &[SessionSummary],
    active: Option<&SessionId>,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "+ New chat (Ctrl+N)",
        Style::default().fg(Color::Green),
    ))];

    for session in sessions {
        let is_active = Some(&session.id) == active;
        let marker = if is_active { "▸ " } else { "  " };
        let title: String = session
            .title
            .chars()
            .take(width.saturating_sub(2))
            .collect();
        let style = if is_active {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(vec![
            Span::styled(marker, style),
            Span::styled(title, style),
        ]));
    }

    lines
}
