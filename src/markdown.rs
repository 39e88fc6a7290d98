//! Markdown to styled ratatui lines for bot replies.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const DEFAULT_WIDTH: usize = 80;

/// Renders `md` into lines no wider than `width` columns.
pub fn render_markdown(md: &str, width: u16, base: Style) -> Vec<Line<'static>> {
    let width = if width == 0 {
        DEFAULT_WIDTH
    } else {
        width as usize
    };
    let mut renderer = Renderer::new(width, base);

    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    for event in Parser::new_ext(md, options) {
        renderer.handle(event);
    }

    renderer.finish()
}

struct Renderer {
    width: usize,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    /// `None` for bullet lists, `Some(next number)` for ordered ones.
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    in_code_block: bool,
    link_dest: Option<String>,
}

impl Renderer {
    fn new(width: usize, base: Style) -> Self {
        Self {
            width,
            lines: Vec::new(),
            spans: Vec::new(),
            style_stack: vec![base],
            lists: Vec::new(),
            quote_depth: 0,
            in_code_block: false,
            link_dest: None,
        }
    }

    fn style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.style().add_modifier(modifier);
        self.style_stack.push(style);
    }

    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush_line();
                let style = heading_style(level, self.style());
                self.style_stack.push(style);
            }
            Event::End(TagEnd::Heading(_)) => {
                self.pop_style();
                self.flush_line();
                self.blank_line();
            }
            Event::Start(Tag::Strong) => self.push_modifier(Modifier::BOLD),
            Event::Start(Tag::Emphasis) => self.push_modifier(Modifier::ITALIC),
            Event::Start(Tag::Strikethrough) => self.push_modifier(Modifier::CROSSED_OUT),
            Event::End(TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough) => {
                self.pop_style()
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                self.link_dest = Some(dest_url.to_string());
                let style = self
                    .style()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::UNDERLINED);
                self.style_stack.push(style);
            }
            Event::End(TagEnd::Link) => {
                self.pop_style();
                if let Some(dest) = self.link_dest.take() {
                    let style = self.style().fg(Color::DarkGray);
                    self.push_text(&format!(" ({})", dest), style);
                }
            }
            Event::Start(Tag::CodeBlock(_)) => {
                self.flush_line();
                self.in_code_block = true;
                self.style_stack.push(Style::default().fg(Color::Cyan));
            }
            Event::End(TagEnd::CodeBlock) => {
                self.flush_line();
                self.pop_style();
                self.in_code_block = false;
                self.blank_line();
            }
            Event::Start(Tag::List(start)) => {
                self.flush_line();
                self.lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            Event::Start(Tag::Item) => {
                self.flush_line();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.spans.push(Span::styled(
                    format!("{}{}", "  ".repeat(depth + 1), marker),
                    self.style(),
                ));
            }
            Event::End(TagEnd::Item) => self.flush_line(),
            Event::Start(Tag::BlockQuote(_)) => {
                self.flush_line();
                self.quote_depth += 1;
                let style = self.style().fg(Color::DarkGray);
                self.style_stack.push(style);
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                self.flush_line();
                self.pop_style();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.blank_line();
            }
            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => {
                self.flush_line();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            Event::Text(text) => {
                if self.in_code_block {
                    self.push_code(&text);
                } else {
                    self.push_text(&text, self.style());
                }
            }
            Event::Code(code) => {
                let style = Style::default().fg(Color::Yellow).bg(Color::DarkGray);
                self.push_text(&format!("`{}`", code), style);
            }
            Event::SoftBreak => self.push_text(" ", self.style()),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(self.width),
                    Style::default().fg(Color::DarkGray),
                )));
                self.blank_line();
            }
            Event::Html(html) | Event::InlineHtml(html) => self.push_text(&html, self.style()),
            _ => {}
        }
    }

    fn quote_prefix(&self) -> Option<Span<'static>> {
        (self.quote_depth > 0).then(|| {
            Span::styled("│ ".repeat(self.quote_depth), Style::default().fg(Color::DarkGray))
        })
    }

    fn current_col(&self) -> usize {
        self.spans.iter().map(|s| s.content.width()).sum()
    }

    fn prefix_width(&self) -> usize {
        self.quote_depth * 2
    }

    /// Ends the current line and opens the next one with the quote prefix.
    fn break_line(&mut self, buf: &mut String, style: Style) {
        if !buf.is_empty() {
            self.spans.push(Span::styled(std::mem::take(buf), style));
        }
        self.flush_line();
        if let Some(prefix) = self.quote_prefix() {
            self.spans.push(prefix);
        }
    }

    /// Word-wraps `text` onto the current line. Words longer than a whole
    /// line (URLs, paths) are broken at the width.
    fn push_text(&mut self, text: &str, style: Style) {
        if self.spans.is_empty() {
            if let Some(prefix) = self.quote_prefix() {
                self.spans.push(prefix);
            }
        }

        let prefix_width = self.prefix_width();
        let line_room = self.width.saturating_sub(prefix_width);
        let mut col = self.current_col();
        let mut buf = String::new();
        for word in text.split_inclusive(' ') {
            let mut word = word;
            let fits_fresh_line = word.trim().width() <= line_room;
            if col + word.width() > self.width && col > prefix_width && fits_fresh_line {
                self.break_line(&mut buf, style);
                col = self.current_col();
                word = word.trim_start();
            }

            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if col + ch_width > self.width && col > prefix_width {
                    if ch == ' ' {
                        continue;
                    }
                    self.break_line(&mut buf, style);
                    col = self.current_col();
                }
                buf.push(ch);
                col += ch_width;
            }
        }
        if !buf.is_empty() {
            self.spans.push(Span::styled(buf, style));
        }
    }

    /// Code keeps its spacing; over-long lines are hard-broken at the width.
    fn push_code(&mut self, code: &str) {
        let style = self.style();
        let room = self.width.saturating_sub(self.prefix_width() + 2).max(1);
        for line in code.lines() {
            for chunk in chunk_by_width(line, room) {
                let mut spans = vec![
                    Span::styled("▎".to_string(), Style::default().fg(Color::DarkGray)),
                    Span::styled(format!(" {}", chunk), style),
                ];
                if let Some(prefix) = self.quote_prefix() {
                    spans.insert(0, prefix);
                }
                self.lines.push(Line::from(spans));
            }
        }
    }

    fn flush_line(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    fn blank_line(&mut self) {
        if self.lines.last().is_some_and(|l| !l.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

fn chunk_by_width(line: &str, width: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut col = 0;
    for ch in line.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if col + ch_width > width && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            col = 0;
        }
        current.push(ch);
        col += ch_width;
    }
    chunks.push(current);
    chunks
}

fn heading_style(level: HeadingLevel, base: Style) -> Style {
    let style = base.add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => style.fg(Color::LightBlue).add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 => style.fg(Color::LightBlue),
        HeadingLevel::H3 => style.fg(Color::Cyan),
        _ => style,
    }
}
