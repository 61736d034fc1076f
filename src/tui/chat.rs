//! # Chat View
//!
//! One open conversation: the core `Session` plus the presentation state
//! around it (input box, scroll, panel toggle) and the channel its turn
//! tasks report back on.
//!
//! Each chat view owns its own channel. Dropping the view aborts every task
//! it spawned and closes the channel, so results from an abandoned
//! conversation have nowhere to land.

use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::AbortHandle;

use crate::backend::{PersonaBackend, spawn_turn};
use crate::core::action::{Action, Effect, update};
use crate::core::persona::Persona;
use crate::core::state::Session;
use crate::core::upload::read_upload;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::TuiEvent;

const UPLOAD_COMMAND: &str = "/upload";

/// Events a chat view emits to the top-level loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEvent {
    /// Back to the Home view.
    Leave,
    Quit,
}

/// `Some(path)` when `text` is an upload command (`path` may be empty).
fn parse_upload_command(text: &str) -> Option<&str> {
    let rest = text.trim().strip_prefix(UPLOAD_COMMAND)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

pub struct ChatView {
    pub session: Session,
    pub input_box: InputBox,
    pub message_list: MessageListState,
    pub show_panel: bool,
    backend: Arc<dyn PersonaBackend>,
    tx: UnboundedSender<Action>,
    rx: UnboundedReceiver<Action>,
    abort_handles: Vec<AbortHandle>,
}

impl ChatView {
    pub fn open(persona: &'static Persona, backend: Arc<dyn PersonaBackend>) -> Self {
        info!("Opening chat with {} ({})", persona.name, persona.id);
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session: Session::new(persona),
            input_box: InputBox::new(),
            message_list: MessageListState::new(),
            show_panel: true,
            backend,
            tx,
            rx,
            abort_handles: Vec::new(),
        }
    }

    /// Run an action through the reducer and carry out its effect.
    pub fn dispatch(&mut self, action: Action) -> Option<ChatEvent> {
        match update(&mut self.session, action) {
            Effect::SpawnTurn(turn) => {
                self.abort_handles.retain(|h| !h.is_finished());
                let handles = spawn_turn(self.backend.clone(), turn, self.tx.clone());
                self.abort_handles.extend(handles);
                None
            }
            Effect::Quit => Some(ChatEvent::Quit),
            Effect::None => None,
        }
    }

    /// Apply every turn result that has arrived. Returns true if any did.
    pub fn drain_results(&mut self) -> bool {
        let mut received = false;
        while let Ok(action) = self.rx.try_recv() {
            debug!("Chat view received: {:?}", action);
            received = true;
            self.dispatch(action);
        }
        received
    }

    /// Sync props the input box reads from the session.
    pub fn sync_props(&mut self) {
        self.input_box.locked = self.session.is_loading();
        self.input_box.staged_file = self.session.pending_file.as_ref().map(|f| f.name.clone());
    }

    fn stage_upload(&mut self, path: &str) {
        if path.is_empty() {
            self.session.status_message = format!("Usage: {UPLOAD_COMMAND} <path>");
            return;
        }
        match read_upload(Path::new(path)) {
            Ok(file) => {
                self.dispatch(Action::StageFile(file));
            }
            Err(e) => {
                warn!("Upload of {} rejected: {}", path, e);
                self.session.status_message = format!("Upload failed: {e}");
            }
        }
    }

    fn submit(&mut self, text: String) -> Option<ChatEvent> {
        if let Some(path) = parse_upload_command(&text) {
            self.stage_upload(path);
            return None;
        }
        if text.trim().is_empty() && self.session.pending_file.is_some() {
            return self.dispatch(Action::SubmitFile);
        }
        self.dispatch(Action::SubmitText(text))
    }

    fn abort_all(&mut self) {
        for handle in self.abort_handles.drain(..) {
            handle.abort();
        }
    }
}

impl EventHandler for ChatView {
    type Event = ChatEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Escape => Some(ChatEvent::Leave),
            TuiEvent::TogglePanel => {
                self.show_panel = !self.show_panel;
                None
            }
            TuiEvent::ClearFile => self.dispatch(Action::ClearPendingFile),
            TuiEvent::ScrollUp
            | TuiEvent::ScrollDown
            | TuiEvent::ScrollPageUp
            | TuiEvent::ScrollPageDown
            | TuiEvent::CursorUp
            | TuiEvent::CursorDown => {
                let scroll = match event {
                    TuiEvent::CursorUp => &TuiEvent::ScrollUp,
                    TuiEvent::CursorDown => &TuiEvent::ScrollDown,
                    other => other,
                };
                self.message_list.handle_event(scroll);
                None
            }
            _ => match self.input_box.handle_event(event)? {
                InputEvent::Submit(text) => self.submit(text),
                InputEvent::ContentChanged => None,
            },
        }
    }
}

impl Drop for ChatView {
    fn drop(&mut self) {
        if !self.abort_handles.is_empty() {
            info!(
                "Leaving chat with {}: aborting {} task(s)",
                self.session.persona.id,
                self.abort_handles.len()
            );
        }
        self.abort_all();
    }
}
