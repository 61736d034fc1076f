//! Runs a [`Turn`] against a backend.
//!
//! A turn is two independent tokio tasks. Each one reports back with a
//! single [`Action`] on the session's channel:
//!
//! ```text
//!              ┌── analysis task ──→ AnalysisReady | AnalysisFailed
//! SpawnTurn ───┤
//!              └── reply task ─────→ ReplyReceived | ReplyFailed
//! ```
//!
//! The tasks are never joined. Only the reply moves the session back to
//! `Idle`, so a slow or failing analysis cannot hold up the conversation.

use std::sync::Arc;

use log::{info, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;

use super::types::{AnalysisRequest, ChatRequest};
use super::PersonaBackend;
use crate::core::action::{Action, Turn};

/// Run the analysis half of a turn to completion.
pub async fn analysis_action(backend: &dyn PersonaBackend, turn: &Turn) -> Action {
    let request = AnalysisRequest::from(turn);
    match backend.analyze(&request).await {
        Ok(analysis) => Action::AnalysisReady {
            message_id: turn.message_id,
            analysis,
        },
        Err(e) => Action::AnalysisFailed {
            message_id: turn.message_id,
            error: e.to_string(),
        },
    }
}

/// Run the reply half of a turn to completion.
pub async fn reply_action(backend: &dyn PersonaBackend, turn: &Turn) -> Action {
    let request = ChatRequest::from(turn);
    match backend.reply(turn.persona_id, &request).await {
        Ok(text) => Action::ReplyReceived(text),
        Err(e) => Action::ReplyFailed(e.to_string()),
    }
}

/// Spawn both halves of a turn. Returns abort handles for teardown.
pub fn spawn_turn(
    backend: Arc<dyn PersonaBackend>,
    turn: Turn,
    tx: UnboundedSender<Action>,
) -> Vec<AbortHandle> {
    info!(
        "Spawning turn on {} backend (persona={}, message={})",
        backend.name(),
        turn.persona_id,
        turn.message_id
    );
    let turn = Arc::new(turn);

    let analysis_handle = {
        let backend = backend.clone();
        let turn = turn.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let action = analysis_action(&*backend, &turn).await;
            if tx.send(action).is_err() {
                warn!("Failed to send analysis result: receiver dropped");
            }
        })
    };

    let reply_handle = tokio::spawn(async move {
        let action = reply_action(&*backend, &turn).await;
        if tx.send(action).is_err() {
            warn!("Failed to send reply: receiver dropped");
        }
    });

    vec![analysis_handle.abort_handle(), reply_handle.abort_handle()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Effect, update};
    use crate::core::persona;
    use crate::core::state::{FALLBACK_REPLY, Phase, Session};
    use crate::test_support::{ScriptedBackend, drain};
    use std::time::Duration;

    fn start(session: &mut Session, text: &str) -> Turn {
        match update(session, Action::SubmitText(text.to_string())) {
            Effect::SpawnTurn(turn) => turn,
            other => panic!("expected SpawnTurn, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn both_results_arrive() {
        let backend = Arc::new(ScriptedBackend::replying("hi"));
        let mut session = Session::new(persona::get("captain"));
        let turn = start(&mut session, "hello");

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        spawn_turn(backend.clone(), turn, tx);
        drain(&mut session, rx).await;

        assert_eq!(session.phase, Phase::Idle);
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[2].content, "hi");
        assert!(session.messages[1].analysis.is_some());
        assert_eq!(backend.reply_persona().as_deref(), Some("captain"));
    }

    #[tokio::test]
    async fn slow_analysis_does_not_block_reply() {
        let backend = Arc::new(
            ScriptedBackend::replying("quick").with_analysis_delay(Duration::from_millis(200)),
        );
        let mut session = Session::new(persona::get("zen"));
        let turn = start(&mut session, "hello");

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        spawn_turn(backend, turn, tx);

        let first = rx.recv().await.expect("an action");
        assert!(matches!(first, Action::ReplyReceived(ref text) if text == "quick"));
        update(&mut session, first);
        assert_eq!(session.phase, Phase::Idle);
        assert!(session.messages[1].analysis.is_none());

        drain(&mut session, rx).await;
        assert!(session.messages[1].analysis.is_some());
        // Reply stays after the user message even though analysis landed later
        assert_eq!(session.messages[2].content, "quick");
    }

    #[tokio::test]
    async fn analysis_may_land_before_reply() {
        let backend = Arc::new(
            ScriptedBackend::replying("later").with_reply_delay(Duration::from_millis(200)),
        );
        let mut session = Session::new(persona::get("chef"));
        let turn = start(&mut session, "hello");

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        spawn_turn(backend, turn, tx);

        let first = rx.recv().await.expect("an action");
        assert!(matches!(first, Action::AnalysisReady { .. }));
        update(&mut session, first);
        assert_eq!(session.phase, Phase::AwaitingResponse);
        assert!(session.is_typing);
        assert!(session.messages[1].analysis.is_some());
        assert!(session.last_analysis.is_some());
        assert_eq!(session.messages.len(), 2);

        drain(&mut session, rx).await;
        assert_eq!(session.phase, Phase::Idle);
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[2].content, "later");
        assert!(session.messages[1].analysis.is_some());
    }

    #[tokio::test]
    async fn failures_degrade_independently() {
        let backend = Arc::new(ScriptedBackend::failing());
        let mut session = Session::new(persona::get("dev"));
        let turn = start(&mut session, "hello");

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        spawn_turn(backend, turn, tx);
        drain(&mut session, rx).await;

        assert_eq!(session.phase, Phase::Idle);
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[2].content, FALLBACK_REPLY);
        assert!(session.messages[1].analysis.is_none());
    }

    #[tokio::test]
    async fn aborted_turn_sends_nothing() {
        let backend = Arc::new(
            ScriptedBackend::replying("never")
                .with_analysis_delay(Duration::from_millis(500))
                .with_reply_delay(Duration::from_millis(500)),
        );
        let mut session = Session::new(persona::get("poet"));
        let turn = start(&mut session, "hello");

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        for handle in spawn_turn(backend, turn, tx) {
            handle.abort();
        }
        assert!(rx.recv().await.is_none());
    }
}
