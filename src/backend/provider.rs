use std::fmt;

use async_trait::async_trait;

use super::types::{AnalysisRequest, ChatRequest};
use crate::core::analysis::Analysis;

/// Errors that can occur while talking to a backend.
/// None of them are retried; the session degrades instead.
#[derive(Debug)]
pub enum BackendError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Backend returned a non-success status.
    Api { status: u16, message: String },
    /// Body did not have the expected shape.
    Parse(String),
    /// This backend cannot serve the request at all (e.g. analysis while offline).
    Unavailable(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            BackendError::Parse(msg) => write!(f, "parse error: {msg}"),
            BackendError::Unavailable(msg) => write!(f, "unavailable: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BackendError::Parse(e.to_string())
        } else {
            BackendError::Network(e.to_string())
        }
    }
}

#[async_trait]
pub trait PersonaBackend: Send + Sync {
    /// Returns the name of the backend.
    fn name(&self) -> &str;

    /// Sentiment, entity and intent analysis of a message.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Analysis, BackendError>;

    /// The persona's reply to a message.
    async fn reply(&self, persona_id: &str, request: &ChatRequest) -> Result<String, BackendError>;
}
