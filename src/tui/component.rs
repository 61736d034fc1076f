use ratatui::Frame;
use ratatui::layout::Rect;

/// A piece of the screen that draws itself into an area.
///
/// Components receive their data as struct fields ("props") and may keep
/// presentation state of their own, such as a scroll offset or a selected
/// row. `render` takes `&mut self` so that state can be updated during the
/// draw pass, the same way ratatui's `StatefulWidget` works.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal events.
pub trait EventHandler {
    /// The high-level event this component emits to its parent.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
