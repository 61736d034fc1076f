//! Offline backend that answers from the persona script table.
//!
//! Used with `--offline` (or `offline = true` in config) to click around the
//! UI without the Python services running. It does not analyze anything:
//! `analyze` always reports [`BackendError::Unavailable`], so the debug
//! panel shows its placeholder.

use async_trait::async_trait;
use log::debug;
use rand::seq::SliceRandom;

use super::types::{AnalysisRequest, ChatRequest};
use super::{BackendError, PersonaBackend};
use crate::core::analysis::Analysis;
use crate::core::persona;
use crate::core::upload::file_name_from_prompt;

#[derive(Debug, Default)]
pub struct CannedBackend;

impl CannedBackend {
    pub fn new() -> Self {
        Self
    }
}

fn pick_reply(persona_id: &str) -> String {
    let replies = persona::canned_replies(persona_id);
    replies
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("...")
        .to_string()
}

fn file_reply(name: &str) -> String {
    format!("I've received your file \"{name}\". What would you like me to do with it?")
}

#[async_trait]
impl PersonaBackend for CannedBackend {
    fn name(&self) -> &str {
        "canned"
    }

    async fn analyze(&self, _request: &AnalysisRequest) -> Result<Analysis, BackendError> {
        Err(BackendError::Unavailable(
            "NLP analysis is not available offline".to_string(),
        ))
    }

    async fn reply(&self, persona_id: &str, request: &ChatRequest) -> Result<String, BackendError> {
        debug!("Canned reply for persona={}", persona_id);
        if request.document_context.is_some()
            && let Some(name) = file_name_from_prompt(&request.user_message)
        {
            return Ok(file_reply(name));
        }
        Ok(pick_reply(persona_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::upload::PendingFile;

    fn request(message: &str, document: Option<&str>) -> ChatRequest {
        ChatRequest {
            user_message: message.to_string(),
            conversation_history: vec![],
            document_context: document.map(str::to_string),
        }
    }

    #[test]
    fn replies_come_from_persona_script() {
        let backend = CannedBackend::new();
        for _ in 0..10 {
            let reply = tokio_test::block_on(backend.reply("zen", &request("hi", None))).unwrap();
            assert!(persona::canned_replies("zen").contains(&reply.as_str()));
        }
    }

    #[test]
    fn unknown_persona_uses_default_replies() {
        let backend = CannedBackend::new();
        let reply = tokio_test::block_on(backend.reply("ghost", &request("hi", None))).unwrap();
        assert!(persona::canned_replies("ghost").contains(&reply.as_str()));
    }

    #[test]
    fn file_turns_acknowledge_the_file() {
        let backend = CannedBackend::new();
        let file = PendingFile::new("notes.txt", "abc");
        let reply =
            tokio_test::block_on(backend.reply("dev", &request(&file.prompt(), Some("abc"))))
                .unwrap();
        assert_eq!(
            reply,
            "I've received your file \"notes.txt\". What would you like me to do with it?"
        );
    }

    #[test]
    fn analysis_is_unavailable() {
        let backend = CannedBackend::new();
        let result = tokio_test::block_on(backend.analyze(&AnalysisRequest {
            text: "hi".to_string(),
            document: None,
        }));
        assert!(matches!(result, Err(BackendError::Unavailable(_))));
    }
}
