//! Frame layouts for the two views.
//!
//! ```text
//! Home                          Chat
//! ┌──────────────────────┐      ┌──────────────────────────────┐
//! │ header               │      │ chat header                  │
//! │ persona list         │      ├────────────────────┬─────────┤
//! │                      │      │ messages           │ NLP     │
//! │                      │      │                    │ panel   │
//! │ status               │      ├────────────────────┴─────────┤
//! └──────────────────────┘      │ input box                    │
//!                               │ key hints                    │
//!                               └──────────────────────────────┘
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::core::analysis::summarize;
use crate::tui::chat::ChatView;
use crate::tui::component::Component;
use crate::tui::components::{ChatHeader, MessageList, NlpPanel, PersonaPicker, PersonaPickerState};
use crate::tui::theme;

/// Width of the NLP side panel when shown.
const PANEL_WIDTH: u16 = 34;
/// Below this terminal width the panel is hidden regardless of the toggle.
const PANEL_MIN_TERMINAL_WIDTH: u16 = 80;

const CHAT_HINTS: &str = "Enter Send  Esc Personas  Ctrl+N Panel  Ctrl+X Clear file  Ctrl+C Quit";

pub fn draw_home(frame: &mut Frame, picker: &mut PersonaPickerState, status: &str) {
    PersonaPicker::new(picker, status).render(frame, frame.area());
}

pub fn draw_chat(frame: &mut Frame, view: &mut ChatView) {
    use Constraint::{Length, Min};

    let area = frame.area();
    let input_height = view.input_box.calculate_height(area.width);
    let [header_area, body_area, input_area, hints_area] =
        Layout::vertical([Length(1), Min(0), Length(input_height), Length(1)]).areas(area);

    ChatHeader::new(view.session.persona, &view.session.status_message).render(frame, header_area);

    let show_panel = view.show_panel && area.width >= PANEL_MIN_TERMINAL_WIDTH;
    let messages_area = if show_panel {
        let [messages_area, panel_area] =
            Layout::horizontal([Min(0), Length(PANEL_WIDTH)]).areas(body_area);
        let summary = summarize(view.session.last_analysis.as_ref());
        NlpPanel::new(&summary).render(frame, panel_area);
        messages_area
    } else {
        body_area
    };

    MessageList::new(&mut view.message_list, &view.session).render(frame, messages_area);
    view.input_box.render(frame, input_area);

    frame.render_widget(
        Paragraph::new(Line::from(CHAT_HINTS)).style(Style::default().fg(theme::MUTED)),
        hints_area,
    );
}
