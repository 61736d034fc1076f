//! Request/response bodies exchanged with the persona and NLP services.

use serde::{Deserialize, Serialize};

use crate::core::action::Turn;
use crate::core::message::HistoryEntry;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

/// One entry of `conversation_history`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryMessage {
    /// `"user"` or `"ai"`.
    pub sender: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl From<&HistoryEntry> for HistoryMessage {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            sender: entry.role.sender().to_string(),
            message: entry.content.clone(),
            timestamp: Some(entry.timestamp.to_rfc3339()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub user_message: String,
    pub conversation_history: Vec<HistoryMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_context: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub response: String,
}

/// Body of `GET /` on the persona service.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HealthResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

impl From<&Turn> for AnalysisRequest {
    fn from(turn: &Turn) -> Self {
        Self {
            text: turn.prompt.clone(),
            document: turn.document.clone(),
        }
    }
}

impl From<&Turn> for ChatRequest {
    fn from(turn: &Turn) -> Self {
        Self {
            user_message: turn.prompt.clone(),
            conversation_history: turn.history.iter().map(HistoryMessage::from).collect(),
            document_context: turn.document.clone(),
        }
    }
}
