use crate::constants::{APP_TITLE, INPUT_PLACEHOLDER};
use crate::markdown::render_markdown;
use crate::message::{Author, Message};
use crate::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

const USER_COLOR: Color = Color::Rgb(255, 223, 128);
const BOT_COLOR: Color = Color::Rgb(144, 238, 144);
const MESSAGE_INDENT: &str = "  ";

pub fn draw_chat(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(1),    // Messages
            Constraint::Length(1), // Status
            Constraint::Length(3), // Input
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    draw_messages(f, app, chunks[1]);

    app.status_indicator.update_spinner();
    app.status_indicator.render(f, chunks[2]);

    draw_input(f, app, chunks[3]);
    draw_footer(f, chunks[4]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            APP_TITLE,
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            app.endpoint.as_str(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

/// Lays out every message as display lines for a pane `width` columns wide.
pub fn conversation_lines(messages: &[Message], width: u16) -> Vec<Line<'static>> {
    let content_width = width.saturating_sub(MESSAGE_INDENT.len() as u16).max(1);
    let mut lines = Vec::new();

    for message in messages {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }

        let (label, color) = match message.author {
            Author::User => ("You", USER_COLOR),
            Author::Bot => ("Assistant", BOT_COLOR),
        };
        lines.push(Line::from(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));

        let body = match message.author {
            Author::User => wrap(&message.content, content_width as usize)
                .into_iter()
                .map(|l| Line::from(Span::styled(l.into_owned(), Style::default().fg(color))))
                .collect(),
            Author::Bot => render_markdown(&message.content, content_width, Style::default()),
        };

        for mut line in body {
            line.spans.insert(0, Span::raw(MESSAGE_INDENT));
            lines.push(line);
        }
    }

    lines
}

fn draw_messages(f: &mut Frame, app: &mut App, area: Rect) {
    let lines = conversation_lines(app.chat.messages(), area.width);

    // Scroll offset counts up from the bottom so new messages stay in view
    let total_lines = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    app.chat.set_viewport(total_lines, area.height);
    let max_scroll = total_lines.saturating_sub(area.height);
    let top = max_scroll.saturating_sub(app.chat.scroll_offset());

    f.render_widget(Paragraph::new(lines).scroll((top, 0)), area);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let loading = app.chat.is_loading();
    let border_style = if loading {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::LightYellow)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title("Message");

    let input = app.chat.input();
    let inner_width = area.width.saturating_sub(2);
    let text_width = u16::try_from(input.width()).unwrap_or(u16::MAX);
    let scroll_offset = text_width.saturating_sub(inner_width.saturating_sub(1));

    let paragraph = if input.is_empty() {
        Paragraph::new(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let style = if loading {
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::White)
        };
        Paragraph::new(Span::styled(input, style)).scroll((0, scroll_offset))
    };
    f.render_widget(paragraph.block(block), area);

    if !loading {
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(text_width - scroll_offset);
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(
        "Enter send · PgUp/PgDn scroll · Ctrl+N new conversation · Ctrl+S export · Esc quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);

    f.render_widget(footer, area);
}
