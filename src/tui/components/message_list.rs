//! # MessageList Component
//!
//! Scrollable view of one session's conversation.
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent scroll state) and the session
//! (props). Heights come from [`MessageBubble::calculate_height`], so the
//! scroll canvas is sized without rendering anything off-screen.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::Session;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageBubble;
use crate::tui::event::TuiEvent;
use crate::tui::theme;

/// Rows reserved under the last bubble while the persona is typing.
const TYPING_ROWS: u16 = 1;
pub const TYPING_DOTS: &str = "● ● ●";

/// Scroll state for the message list.
/// Must be persisted in the parent chat view.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Canvas height from the last render
    pub content_height: u16,
    /// Viewport height from the last render
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            content_height: 0,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Clamp the offset to the content and re-pin once the bottom is reached.
    fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Scrollable conversation view component.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub session: &'a Session,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, session: &'a Session) -> Self {
        Self { state, session }
    }

    fn typing_line(&self) -> Line<'static> {
        let persona = self.session.persona;
        let accent = Style::default().fg(theme::color_for(persona.color));
        Line::from(vec![
            Span::styled(format!("{} ", persona.glyph()), accent),
            Span::styled(
                TYPING_DOTS,
                accent.add_modifier(Modifier::DIM | Modifier::BOLD),
            ),
        ])
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // scrollbar column

        let heights: Vec<u16> = self
            .session
            .messages
            .iter()
            .map(|m| MessageBubble::calculate_height(m, content_width))
            .collect();
        let messages_height: u16 = heights.iter().sum();
        let typing_rows = if self.session.is_typing { TYPING_ROWS } else { 0 };
        let canvas_height = messages_height + typing_rows;

        self.state.content_height = canvas_height;
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom && self.state.scroll_state.offset().y > self.state.max_offset() {
            self.state.scroll_state.set_offset(Position {
                x: 0,
                y: self.state.max_offset(),
            });
        }

        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y: u16 = 0;
        for (message, height) in self.session.messages.iter().zip(heights) {
            let rect = Rect::new(0, y, content_width, height);
            scroll_view.render_widget(MessageBubble::new(message, self.session.persona), rect);
            y += height;
        }

        if self.session.is_typing {
            let rect = Rect::new(0, y, content_width, TYPING_ROWS);
            scroll_view.render_widget(Paragraph::new(self.typing_line()), rect);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}
