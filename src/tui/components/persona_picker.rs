//! # Persona Picker Component
//!
//! The Home view: every registered persona as a selectable card list.
//! Enter opens a chat with the highlighted persona.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `PersonaPickerState` lives in the Home view
//! - `PersonaPicker` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Padding, Paragraph};

use crate::core::persona::{self, Persona};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme;

/// Events emitted by the persona picker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickerEvent {
    Open(&'static Persona),
    Quit,
}

pub struct PersonaPickerState {
    pub personas: &'static [Persona],
    pub list_state: ListState,
}

impl Default for PersonaPickerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonaPickerState {
    pub fn new() -> Self {
        let personas = persona::list();
        let mut list_state = ListState::default();
        if !personas.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            personas,
            list_state,
        }
    }

    /// Highlight the persona with this id, if registered.
    pub fn select_id(&mut self, id: &str) {
        if let Some(index) = self.personas.iter().position(|p| p.id == id) {
            self.list_state.select(Some(index));
        }
    }

    pub fn selected(&self) -> Option<&'static Persona> {
        self.list_state.selected().and_then(|i| self.personas.get(i))
    }

    fn move_by(&mut self, delta: isize) {
        if self.personas.is_empty() {
            return;
        }
        let last = self.personas.len() - 1;
        let current = self.list_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        self.list_state.select(Some(next));
    }
}

impl EventHandler for PersonaPickerState {
    type Event = PickerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorUp | TuiEvent::InputChar('k') => {
                self.move_by(-1);
                None
            }
            TuiEvent::CursorDown | TuiEvent::InputChar('j') => {
                self.move_by(1);
                None
            }
            TuiEvent::Submit => self.selected().map(PickerEvent::Open),
            TuiEvent::Escape | TuiEvent::InputChar('q') => Some(PickerEvent::Quit),
            _ => None,
        }
    }
}

/// Transient render wrapper for the Home view.
pub struct PersonaPicker<'a> {
    pub state: &'a mut PersonaPickerState,
    /// Status line (backend health, fallback notices)
    pub status: &'a str,
}

impl<'a> PersonaPicker<'a> {
    pub fn new(state: &'a mut PersonaPickerState, status: &'a str) -> Self {
        Self { state, status }
    }
}

fn persona_item(p: &Persona) -> ListItem<'static> {
    let accent = Style::default().fg(theme::color_for(p.color));
    ListItem::new(vec![
        Line::from(vec![
            Span::raw(format!("{} ", p.glyph())),
            Span::styled(p.name, accent.add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", p.role), accent),
        ]),
        Line::from(Span::styled(
            format!("   {}", p.description),
            Style::default().fg(theme::MUTED),
        )),
        Line::default(),
    ])
}

impl<'a> Component for PersonaPicker<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        use Constraint::{Length, Min};
        let [header_area, list_area, status_area] =
            Layout::vertical([Length(3), Min(0), Length(1)]).areas(area);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                "Dialogix",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Choose someone to talk to",
                Style::default().fg(theme::MUTED),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(header, header_area);

        let items: Vec<ListItem> = self.state.personas.iter().map(persona_item).collect();
        let list = List::new(items)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme::MUTED))
                    .title(" Personas ")
                    .title_bottom(Line::from(" ↑↓ Select  Enter Chat  Esc Quit ").centered())
                    .padding(Padding::horizontal(1)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, list_area, &mut self.state.list_state);

        frame.render_widget(
            Paragraph::new(self.status).style(Style::default().fg(theme::MUTED)),
            status_area,
        );
    }
}
