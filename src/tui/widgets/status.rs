// ABOUTME: Status bar and quick-action widgets — one-line summaries around the input box.
// ABOUTME: Shows model, session count, store path, busy indicator, and the F1–F4 sample questions.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Render the status bar line.
pub fn status_line(model: &str, session_count: usize, store_path: &str, busy: bool) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(format!(" {} ", model), Style::default().fg(Color::Cyan)),
        Span::styled("| ", dim),
        Span::styled(
            format!(
                "{} chat{} ",
                session_count,
                if session_count == 1 { "" } else { "s" }
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled("| ", dim),
        Span::styled(format!("{} ", store_path), dim),
    ];

    if busy {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled(
            "thinking... ",
            Style::default().fg(Color::Yellow),
        ));
    }

    Line::from(spans)
}

/// Render the quick-action row: each sample question with its function key.
pub fn quick_actions_line(questions: &[&str]) -> Line<'static> {
    let mut spans = vec![Span::styled(" Try: ", Style::default().fg(Color::DarkGray))];
    for (i, question) in questions.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("F{}", i + 1),
            Style::default().fg(Color::Magenta),
        ));
        spans.push(Span::raw(format!(" {}", question)));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn status_line_shows_busy() {
        let line = status_line("gemini-2.5-flash-lite", 3, "chat_sessions.json", true);
        let text = text(&line);
        assert!(text.contains("gemini-2.5-flash-lite"));
        assert!(text.contains("3 chats"));
        assert!(text.contains("chat_sessions.json"));
        assert!(text.contains("thinking..."));
    }

    #[test]
    fn status_line_idle_singular() {
        let text = text(&status_line("echo", 1, "s.json", false));
        assert!(text.contains("1 chat "));
        assert!(!text.contains("thinking"));
    }

    #[test]
    fn quick_actions_are_numbered() {
        let text = text(&quick_actions_line(&["Dorms?", "Clubs?"]));
        assert_eq!(text, " Try: F1 Dorms?  F2 Clubs?");
    }
}
