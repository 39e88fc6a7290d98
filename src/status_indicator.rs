use crate::constants::TYPING_INDICATOR;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

#[derive(Debug, Default)]
pub struct StatusIndicator {
    thinking: bool,
    status_text: String,
    spinner_idx: usize,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_thinking(&mut self, thinking: bool) {
        self.thinking = thinking;
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status_text = status.into();
    }

    pub fn status(&self) -> &str {
        &self.status_text
    }

    pub fn clear_status(&mut self) {
        self.status_text.clear();
    }

    pub fn update_spinner(&mut self) {
        self.spinner_idx = self.spinner_idx.wrapping_add(1);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        // Typing takes precedence over any leftover status text
        let line = if self.thinking {
            Line::from(vec![
                Span::styled(
                    SPINNER_FRAMES[self.spinner_idx % SPINNER_FRAMES.len()],
                    Style::default().fg(Color::Gray),
                ),
                Span::raw(" "),
                Span::styled(TYPING_INDICATOR, Style::default().fg(Color::DarkGray)),
            ])
        } else {
            Line::from(Span::styled(
                self.status_text.as_str(),
                Style::default().fg(Color::Yellow),
            ))
        };

        frame.render_widget(Paragraph::new(line).alignment(Alignment::Left), area);
    }
}
