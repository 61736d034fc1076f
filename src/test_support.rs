//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::backend::{AnalysisRequest, BackendError, ChatRequest, PersonaBackend};
use crate::core::action::{Action, update};
use crate::core::analysis::{Analysis, Sentiment};
use crate::core::state::Session;

/// A backend with fixed answers and optional artificial latency.
pub struct ScriptedBackend {
    reply: Option<String>,
    analysis_ok: bool,
    analysis_delay: Duration,
    reply_delay: Duration,
    last_persona: Mutex<Option<String>>,
}

impl ScriptedBackend {
    /// Both halves succeed; the reply is `text`.
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            analysis_ok: true,
            analysis_delay: Duration::ZERO,
            reply_delay: Duration::ZERO,
            last_persona: Mutex::new(None),
        }
    }

    /// Both halves fail.
    pub fn failing() -> Self {
        Self {
            reply: None,
            analysis_ok: false,
            ..Self::replying("")
        }
    }

    pub fn with_analysis_delay(mut self, delay: Duration) -> Self {
        self.analysis_delay = delay;
        self
    }

    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    /// Persona id passed to the most recent `reply` call.
    pub fn reply_persona(&self) -> Option<String> {
        self.last_persona.lock().unwrap().clone()
    }
}

/// A small analysis that every successful `ScriptedBackend` returns.
pub fn sample_analysis() -> Analysis {
    Analysis {
        sentiment: Some(Sentiment {
            negative: 0.0,
            neutral: 0.4,
            positive: 0.6,
            compound: 0.6,
        }),
        entities: vec![],
        intents: BTreeMap::from([("greeting".to_string(), 0.9)]),
        document_summary: None,
        document_entities: None,
    }
}

#[async_trait]
impl PersonaBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn analyze(&self, _request: &AnalysisRequest) -> Result<Analysis, BackendError> {
        tokio::time::sleep(self.analysis_delay).await;
        if self.analysis_ok {
            Ok(sample_analysis())
        } else {
            Err(BackendError::Network("connection refused".to_string()))
        }
    }

    async fn reply(&self, persona_id: &str, _request: &ChatRequest) -> Result<String, BackendError> {
        *self.last_persona.lock().unwrap() = Some(persona_id.to_string());
        tokio::time::sleep(self.reply_delay).await;
        self.reply.clone().ok_or(BackendError::Api {
            status: 500,
            message: "internal error".to_string(),
        })
    }
}

/// Apply every action until all senders are gone.
pub async fn drain(session: &mut Session, mut rx: UnboundedReceiver<Action>) {
    while let Some(action) = rx.recv().await {
        update(session, action);
    }
}
