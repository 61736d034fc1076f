//! # ChatHeader Component
//!
//! One-line bar above the conversation: who you are talking to, what they
//! are doing, and the status line.
//!
//! Stateless: every field is a prop copied from the session each frame.
//!
//! Layout priority on narrow terminals: persona first, then status. The
//! status is dropped before the persona name is truncated.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::persona::Persona;
use crate::tui::component::Component;
use crate::tui::theme;

pub struct ChatHeader<'a> {
    pub persona: &'a Persona,
    pub status_message: &'a str,
}

impl<'a> ChatHeader<'a> {
    pub fn new(persona: &'a Persona, status_message: &'a str) -> Self {
        Self {
            persona,
            status_message,
        }
    }

    fn line(&self, width: u16) -> Line<'a> {
        let accent = Style::default().fg(theme::color_for(self.persona.color));
        let mut spans = vec![
            Span::raw(format!("{} ", self.persona.glyph())),
            Span::styled(self.persona.name, accent.add_modifier(Modifier::BOLD)),
            Span::styled(format!(" · {}", self.persona.role), accent),
        ];

        let used: usize = spans.iter().map(Span::width).sum();
        let status = format!(" | {}", self.status_message);
        if !self.status_message.is_empty() && used + status.chars().count() <= usize::from(width) {
            spans.push(Span::styled(status, Style::default().fg(theme::MUTED)));
        }
        Line::from(spans)
    }
}

impl<'a> Component for ChatHeader<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.line(area.width)), area);
    }
}
