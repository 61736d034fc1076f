//! HTTP backend: the persona chat service and the NLP analysis service.
//!
//! - `POST {chat}/api/personas/{id}/chat`: persona reply
//! - `POST {nlp}/api/nlp/analyze`: sentiment / entities / intents
//! - `GET {chat}/`: health probe
//!
//! Both services are plain JSON over HTTP, no auth, no streaming.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::types::{AnalysisRequest, ChatRequest, ChatResponse, HealthResponse};
use super::{BackendError, PersonaBackend};
use crate::core::analysis::Analysis;

#[derive(Clone)]
pub struct HttpBackend {
    chat_base_url: String,
    nlp_base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(chat_base_url: impl Into<String>, nlp_base_url: impl Into<String>) -> Self {
        Self {
            chat_base_url: chat_base_url.into().trim_end_matches('/').to_string(),
            nlp_base_url: nlp_base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn chat_url(&self, persona_id: &str) -> String {
        format!("{}/api/personas/{}/chat", self.chat_base_url, persona_id)
    }

    pub fn analyze_url(&self) -> String {
        format!("{}/api/nlp/analyze", self.nlp_base_url)
    }

    /// Probe the persona service root.
    pub async fn health(&self) -> Result<HealthResponse, BackendError> {
        let response = self
            .client
            .get(format!("{}/", self.chat_base_url))
            .send()
            .await?;
        read_json(response).await
    }
}

/// Turn a response into `T`, mapping non-2xx and bad bodies to `BackendError`.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    debug!("Backend response status: {}", status);

    if !status.is_success() {
        let err_body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        warn!("Backend API error: {} - {}", status.as_u16(), err_body);
        return Err(BackendError::Api {
            status: status.as_u16(),
            message: err_body,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        debug!("Unparseable body: {}", body);
        BackendError::Parse(e.to_string())
    })
}

#[async_trait]
impl PersonaBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<Analysis, BackendError> {
        info!(
            "Analysis request: text_len={}, document={}",
            request.text.len(),
            request.document.is_some()
        );
        let response = self
            .client
            .post(self.analyze_url())
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    async fn reply(&self, persona_id: &str, request: &ChatRequest) -> Result<String, BackendError> {
        info!(
            "Chat request: persona={}, history_len={}, document={}",
            persona_id,
            request.conversation_history.len(),
            request.document_context.is_some()
        );
        let response = self
            .client
            .post(self.chat_url(persona_id))
            .json(request)
            .send()
            .await?;
        let chat: ChatResponse = read_json(response).await?;
        Ok(chat.response)
    }
}
