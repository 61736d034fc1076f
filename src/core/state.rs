//! # Session State
//!
//! Core state for one persona conversation. Domain data only; no
//! TUI-specific types. Presentation state (input buffer, scroll position)
//! lives in the `tui` module.
//!
//! ```text
//! Session
//! ├── persona: &'static Persona       // who we are talking to
//! ├── messages: Vec<Message>          // display order == chronological order
//! ├── pending_file: Option<PendingFile> // staged upload
//! ├── phase: Phase                    // Idle | AwaitingResponse
//! ├── is_typing: bool                 // typing indicator
//! ├── last_analysis: Option<Analysis> // analysis of the newest turn
//! └── status_message: String          // status line text
//! ```
//!
//! State changes only happen through `update(session, action)` in action.rs.

use crate::core::analysis::Analysis;
use crate::core::message::{HistoryEntry, Message, MessageId};
use crate::core::persona::{self, Persona};
use crate::core::upload::PendingFile;

/// Shown in place of a reply when the reply request fails.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble responding right now. Please try again in a moment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// A reply request is in flight.
    AwaitingResponse,
}

pub struct Session {
    pub persona: &'static Persona,
    pub messages: Vec<Message>,
    pub pending_file: Option<PendingFile>,
    pub phase: Phase,
    pub is_typing: bool,
    pub last_analysis: Option<Analysis>,
    pub status_message: String,
    /// User message of the newest turn; only its analysis feeds `last_analysis`.
    pub(crate) current_turn: Option<MessageId>,
    /// The staged file the in-flight turn sent as document context.
    pub(crate) file_in_flight: Option<PendingFile>,
}

impl Session {
    /// Starts a conversation with the persona's welcome message.
    pub fn new(persona: &'static Persona) -> Self {
        Self {
            persona,
            messages: vec![Message::assistant(persona::welcome_message(persona.id))],
            pending_file: None,
            phase: Phase::Idle,
            is_typing: false,
            last_analysis: None,
            status_message: format!("Chatting with {}", persona.name),
            current_turn: None,
            file_in_flight: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::AwaitingResponse
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// The conversation so far, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.messages.iter().map(HistoryEntry::from).collect()
    }

    /// Attach an analysis to the message with `id`. Returns false if no such message exists.
    pub(crate) fn attach_analysis(&mut self, id: MessageId, analysis: Analysis) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.analysis = Some(analysis);
                true
            }
            None => false,
        }
    }
}
