//! # Messages
//!
//! A conversation is an ordered list of [`Message`]s. Each message gets a
//! random [`MessageId`] at creation so a late analysis result can find the
//! message it belongs to, no matter how many messages were created in the
//! same instant.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::analysis::Analysis;

/// Unique identifier of a message within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Sender tag used in the backend's conversation history.
    pub fn sender(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "ai",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub role: Role,
    pub timestamp: DateTime<Local>,
    /// NLP analysis attached after the fact, if the backend produced one.
    pub analysis: Option<Analysis>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            content: content.into(),
            role,
            timestamp: Local::now(),
            analysis: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// One prior message, as sent along with a turn for context.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

impl From<&Message> for HistoryEntry {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
            timestamp: message.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_do_not_collide_within_the_same_instant() {
        let ids: HashSet<MessageId> = (0..1000).map(|_| Message::user("x").id).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn role_sender_tags() {
        assert_eq!(Role::User.sender(), "user");
        assert_eq!(Role::Assistant.sender(), "ai");
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn new_messages_have_no_analysis() {
        let msg = Message::assistant("hi");
        assert!(!msg.is_user());
        assert!(msg.analysis.is_none());
    }

    #[test]
    fn history_entry_copies_role_and_content() {
        let msg = Message::user("hello");
        let entry = HistoryEntry::from(&msg);
        assert_eq!(entry.role, Role::User);
        assert_eq!(entry.content, "hello");
        assert_eq!(entry.timestamp, msg.timestamp);
    }
}
