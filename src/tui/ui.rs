// ABOUTME: Main TUI rendering function — header, session sidebar, chat, quick actions, input, status.
// ABOUTME: Splits the terminal frame into layout chunks and delegates to widgets.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::prompt::SAMPLE_QUESTIONS;
use crate::tui::state::TuiState;
use crate::tui::widgets::chat::render_chat_lines;
use crate::tui::widgets::sessions::session_lines;
use crate::tui::widgets::status::{quick_actions_line, status_line};

pub const APP_TITLE: &str = "🎓 University Life Chatbot";
pub const TAGLINE: &str =
    "Ask me anything about university life—academics, campus tips, student life, and more!";
pub const INPUT_PLACEHOLDER: &str = "Ask about university life...";

const SIDEBAR_WIDTH: u16 = 28;
const MAX_INPUT_HEIGHT: u16 = 8;

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, state: &mut TuiState) {
    let area = frame.area();

    // +2 accounts for top and bottom borders
    let input_height = (state.input_line_count() as u16 + 2).clamp(3, MAX_INPUT_HEIGHT);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),            // Header
            Constraint::Min(3),               // Sidebar + chat
            Constraint::Length(1),            // Quick actions
            Constraint::Length(input_height), // Input
            Constraint::Length(1),            // Status bar
        ])
        .split(area);

    let header = vec![
        Line::from(Span::styled(
            format!(" {}", APP_TITLE),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" {}", TAGLINE),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(header), rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
        .split(rows[1]);

    // Sidebar
    let sidebar_block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(Color::DarkGray));
    let sidebar_width = sidebar_block.inner(columns[0]).width as usize;
    let sidebar = Paragraph::new(session_lines(
        &state.sessions,
        state.active.as_ref(),
        sidebar_width,
    ))
    .block(sidebar_block);
    frame.render_widget(sidebar, columns[0]);

    // Chat area
    let chat_block = Block::default().title(Span::styled(
        format!(" {} ", state.title),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    let chat_chunk = chat_block.inner(columns[1]);
    frame.render_widget(chat_block, columns[1]);

    let chat_paragraph = Paragraph::new(render_chat_lines(&state.messages)).wrap(Wrap { trim: false });
    let total_lines = chat_paragraph.line_count(chat_chunk.width) as u16;
    let max_scroll = total_lines.saturating_sub(chat_chunk.height);

    // Cap scroll_offset so it can't go past the top of the content.
    if state.scroll_offset > max_scroll {
        state.scroll_offset = max_scroll;
    }

    // scroll_offset is lines scrolled up from the bottom (0 = at bottom)
    let scroll = max_scroll.saturating_sub(state.scroll_offset);
    frame.render_widget(chat_paragraph.scroll((scroll, 0)), chat_chunk);

    // Quick actions
    frame.render_widget(Paragraph::new(quick_actions_line(&SAMPLE_QUESTIONS)), rows[2]);

    // Input area
    let input_chunk = rows[3];
    let mut input_block = Block::default().borders(Borders::TOP | Borders::BOTTOM);
    if state.busy {
        input_block = input_block.title(Span::styled(
            " thinking... ",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let input = if state.input.is_empty() {
        Paragraph::new(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(state.input.clone())
    };
    frame.render_widget(input.block(input_block), input_chunk);

    if input_chunk.width > 0 && input_chunk.height > 1 {
        state.clamp_cursor();
        let (cursor_line, cursor_col) = state.cursor_line_and_column();

        // Visual (display) width of the text before the cursor on its line.
        let line_text = state.input.split('\n').nth(cursor_line).unwrap_or("");
        let prefix: String = line_text.chars().take(cursor_col).collect();
        let visual_col = UnicodeWidthStr::width(prefix.as_str());
        let max_visual_col = input_chunk.width.saturating_sub(1) as usize;

        let cursor_x = input_chunk
            .x
            .saturating_add(visual_col.min(max_visual_col) as u16);
        // +1 for the top border, then offset by the cursor's line index.
        let cursor_y = input_chunk.y.saturating_add(1 + cursor_line as u16);
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }

    // Status bar
    let status = status_line(&state.model, state.sessions.len(), &state.store_path, state.busy);
    frame.render_widget(Paragraph::new(status), rows[4]);
}
