//! # InputBox Component
//!
//! The chat view's text field. Owns the text buffer and cursor; the staged
//! file name and the locked flag are props set by the chat view each frame.
//!
//! Text is pre-wrapped with `textwrap` so the box height, the rendered
//! lines and the cursor position all agree. Columns are measured with
//! `unicode-width`, so wide glyphs move the cursor by two cells.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme;

/// Border (2) + padding (2) consumed horizontally
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders
const VERTICAL_OVERHEAD: u16 = 2;
/// Content lines shown before the box scrolls internally
pub const MAX_VISIBLE_LINES: u16 = 5;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed. The text may be blank (a staged file can still be sent).
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    pub buffer: String,
    /// Cursor as a byte offset into `buffer`
    cursor: usize,
    /// Name of the staged file, if any (prop)
    pub staged_file: Option<String>,
    /// While a turn is in flight Enter is swallowed and the buffer kept (prop)
    pub locked: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

fn wrap_options(width: usize) -> textwrap::Options<'static> {
    textwrap::Options::new(width)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Wrap `text` to `width`, one entry per screen row. Empty logical lines
/// (including a trailing newline) still get a row.
fn wrap_rows(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    for line in text.split('\n') {
        if line.is_empty() {
            rows.push(String::new());
        } else {
            rows.extend(textwrap::wrap(line, wrap_options(width)).into_iter().map(|c| c.into_owned()));
        }
    }
    rows
}

fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            staged_file: None,
            locked: false,
        }
    }

    /// Height needed for the current buffer, between one and `MAX_VISIBLE_LINES` rows of text.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let rows = wrap_rows(&self.buffer, inner_width(area_width)).len() as u16;
        rows.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// (row, column) of the cursor within the wrapped text.
    fn cursor_cell(&self, width: u16) -> (u16, u16) {
        // A sentinel glyph keeps trailing spaces from being trimmed by the wrapper
        let probe = format!("{}x", &self.buffer[..self.cursor]);
        let rows = wrap_rows(&probe, width);
        let row = rows.len().saturating_sub(1) as u16;
        let col = rows
            .last()
            .map_or(0, |last| last.width().saturating_sub(1) as u16);
        (row, col)
    }

    fn title(&self) -> String {
        match &self.staged_file {
            Some(name) => format!(" 📎 {name} (Enter to send, Ctrl+X to clear) "),
            None => " Message (/upload <path> to attach a file) ".to_string(),
        }
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map_or(self.buffer.len(), |c| self.cursor + c.len_utf8())
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        let rows = wrap_rows(&self.buffer, width);
        let (cursor_row, cursor_col) = self.cursor_cell(width);
        let scroll = cursor_row.saturating_sub(MAX_VISIBLE_LINES - 1);

        let border = if self.locked {
            Style::default().fg(theme::MUTED)
        } else {
            Style::default().fg(theme::USER_ACCENT)
        };
        let title_style = if self.staged_file.is_some() {
            border.add_modifier(Modifier::BOLD)
        } else {
            border
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(Line::from(self.title()).style(title_style))
            .padding(Padding::horizontal(1));

        let lines: Vec<Line> = rows.into_iter().map(Line::from).collect();
        frame.render_widget(
            Paragraph::new(lines).block(block).scroll((scroll, 0)),
            area,
        );

        if !self.locked {
            // 1 border + 1 padding
            let x = area.x + 2 + cursor_col.min(width.saturating_sub(1));
            let y = area.y + 1 + cursor_row - scroll;
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.buffer.insert_str(self.cursor, text);
                self.cursor += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = self.prev_boundary();
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = self.next_boundary();
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft if self.cursor > 0 => {
                self.cursor = self.prev_boundary();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorRight if self.cursor < self.buffer.len() => {
                self.cursor = self.next_boundary();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorHome => {
                self.cursor = 0;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Submit if !self.locked => {
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
