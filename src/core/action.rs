//! # Actions
//!
//! Everything that can happen in a conversation becomes an `Action`.
//! User presses Enter? That's `Action::SubmitText(text)`.
//! Backend answers? That's `Action::ReplyReceived(text)`.
//!
//! The `update()` function takes the session and an action, mutates the
//! session, and returns an `Effect` describing any I/O the caller must
//! perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! Session + Action  →  update()  →  Effect
//! ```
//!
//! A turn is two independent requests: analysis and reply. Only the reply
//! drives the `Idle` ↔ `AwaitingResponse` lifecycle; analysis is
//! side-channel enrichment that attaches to the user message whenever (and
//! if ever) it arrives.

use log::{debug, info, warn};

use crate::core::analysis::Analysis;
use crate::core::message::{HistoryEntry, Message, MessageId};
use crate::core::state::{FALLBACK_REPLY, Phase, Session};
use crate::core::upload::PendingFile;

/// One outbound exchange with the backend, produced by a submit.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub persona_id: &'static str,
    /// The user message that analysis results attach to.
    pub message_id: MessageId,
    pub prompt: String,
    /// Uploaded file content sent as document context.
    pub document: Option<String>,
    /// Messages before the one that triggered this turn.
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug)]
pub enum Action {
    SubmitText(String),
    StageFile(PendingFile),
    SubmitFile,
    ClearPendingFile,
    AnalysisReady {
        message_id: MessageId,
        analysis: Analysis,
    },
    AnalysisFailed {
        message_id: MessageId,
        error: String,
    },
    ReplyReceived(String),
    ReplyFailed(String),
    Quit,
}

#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    /// Spawn the analysis and reply requests for this turn.
    SpawnTurn(Turn),
    Quit,
}

pub fn update(session: &mut Session, action: Action) -> Effect {
    match action {
        Action::SubmitText(text) => {
            if text.trim().is_empty() || session.is_loading() {
                debug!("Ignoring submit (blank or busy)");
                return Effect::None;
            }
            Effect::SpawnTurn(begin_turn(session, text.clone(), text, None))
        }

        Action::StageFile(file) => {
            info!("Staged file {}", file.name);
            // Keep the typing status while a reply is pending
            if !session.is_loading() {
                session.status_message = format!("Attached {}", file.name);
            }
            session.pending_file = Some(file);
            Effect::None
        }

        Action::SubmitFile => {
            if session.is_loading() {
                debug!("Ignoring file submit while awaiting response");
                return Effect::None;
            }
            let Some(file) = session.pending_file.clone() else {
                return Effect::None;
            };
            let notice = file.upload_notice();
            let prompt = file.prompt();
            let document = file.content.clone();
            session.file_in_flight = Some(file);
            Effect::SpawnTurn(begin_turn(session, notice, prompt, Some(document)))
        }

        Action::ClearPendingFile => {
            if let Some(file) = session.pending_file.take() {
                info!("Discarded staged file {}", file.name);
                session.status_message = format!("Removed {}", file.name);
            }
            Effect::None
        }

        Action::AnalysisReady {
            message_id,
            analysis,
        } => {
            let current = session.current_turn == Some(message_id);
            if session.attach_analysis(message_id, analysis.clone()) {
                if current {
                    session.last_analysis = Some(analysis);
                } else {
                    debug!("Late analysis for earlier message {}", message_id);
                }
            } else {
                warn!("Analysis arrived for unknown message {}", message_id);
            }
            Effect::None
        }

        Action::AnalysisFailed { message_id, error } => {
            warn!("Analysis unavailable for message {}: {}", message_id, error);
            Effect::None
        }

        Action::ReplyReceived(text) => {
            finish_turn(session, text);
            Effect::None
        }

        Action::ReplyFailed(error) => {
            warn!("Reply failed, using fallback: {}", error);
            finish_turn(session, FALLBACK_REPLY.to_string());
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}

/// Append the user message and enter `AwaitingResponse`.
fn begin_turn(
    session: &mut Session,
    visible: String,
    prompt: String,
    document: Option<String>,
) -> Turn {
    let history = session.history();
    let message = Message::user(visible);
    let message_id = message.id;
    session.messages.push(message);
    session.phase = Phase::AwaitingResponse;
    session.is_typing = true;
    session.current_turn = Some(message_id);
    session.last_analysis = None;
    session.status_message = format!("{} is typing...", session.persona.name);

    info!(
        "Turn started: persona={}, history_len={}, document={}",
        session.persona.id,
        history.len(),
        document.is_some()
    );

    Turn {
        persona_id: session.persona.id,
        message_id,
        prompt,
        document,
        history,
    }
}

/// Append the assistant message and return to `Idle`.
fn finish_turn(session: &mut Session, text: String) {
    if !session.is_loading() {
        warn!("Reply arrived with no turn in flight; ignoring");
        return;
    }
    session.messages.push(Message::assistant(text));
    session.phase = Phase::Idle;
    session.is_typing = false;
    session.status_message = format!("Chatting with {}", session.persona.name);
    // A file staged while the turn was in flight waits for the next submit
    if let Some(sent) = session.file_in_flight.take()
        && session.pending_file.as_ref() == Some(&sent)
    {
        session.pending_file = None;
    }
}
