use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::message::Message;
use crate::core::persona::Persona;
use crate::tui::component::Component;
use crate::tui::theme;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Share of the row a bubble may occupy, so the two sides stay visually apart.
const BUBBLE_WIDTH_PERCENT: u16 = 80;
/// Below this row width bubbles take the whole row.
const MIN_SPLIT_WIDTH: u16 = 24;

const USER_GLYPH: &str = "👤";
const USER_NAME: &str = "You";

/// Local time-of-day as `h:mm AM/PM`.
pub fn format_time(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%-I:%M %p").to_string()
}

/// Width of a bubble inside a row of `row_width` columns.
fn bubble_width(row_width: u16) -> u16 {
    if row_width < MIN_SPLIT_WIDTH {
        row_width
    } else {
        row_width * BUBBLE_WIDTH_PERCENT / 100
    }
}

fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// A single chat bubble: a pure function of the message and the persona it
/// belongs to.
///
/// User messages sit on the right under "You", assistant messages on the left
/// under the persona's glyph and name, drawn in the persona's color.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub message: &'a Message,
    pub persona: &'a Persona,
}

impl<'a> MessageBubble<'a> {
    pub fn new(message: &'a Message, persona: &'a Persona) -> Self {
        Self { message, persona }
    }

    /// The bubble's title line.
    pub fn header(&self) -> String {
        let time = format_time(&self.message.timestamp);
        if self.message.is_user() {
            format!("{USER_NAME} • {time} {USER_GLYPH}")
        } else {
            format!("{} {} • {time}", self.persona.glyph(), self.persona.name)
        }
    }

    /// Predict the rendered height for a row of the given width, without rendering.
    ///
    /// Uses the same wrapping rules as the `Paragraph` below so scroll
    /// positions line up with what is drawn.
    pub fn calculate_height(message: &Message, row_width: u16) -> u16 {
        let content_width = bubble_width(row_width).saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let content = message.content.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let lines = textwrap::wrap(content, wrap_options(content_width));
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }

    fn accent(&self) -> Style {
        if self.message.is_user() {
            Style::default().fg(theme::USER_ACCENT)
        } else {
            Style::default().fg(theme::color_for(self.persona.color))
        }
    }
}

impl<'a> Widget for MessageBubble<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = bubble_width(area.width);
        let x = if self.message.is_user() {
            area.x + area.width.saturating_sub(width)
        } else {
            area.x
        };
        let bubble = Rect::new(x, area.y, width, area.height);

        let accent = self.accent();
        let title = Line::from(self.header()).style(accent.add_modifier(Modifier::BOLD));
        let title = if self.message.is_user() {
            title.right_aligned()
        } else {
            title.left_aligned()
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(accent.add_modifier(Modifier::DIM))
            .title(title)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(bubble);
        block.render(bubble, buf);

        Paragraph::new(self.message.content.trim())
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

impl<'a> Component for MessageBubble<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
