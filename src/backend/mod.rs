//! # Backend Adapter
//!
//! Everything that talks to the outside world on behalf of a session:
//! the [`PersonaBackend`] trait, its HTTP and canned implementations, and
//! the task spawner that runs a [`Turn`](crate::core::action::Turn).

pub mod provider;
pub mod canned;
pub mod http;
pub mod turn;
pub mod types;

pub use provider::{BackendError, PersonaBackend};
pub use canned::CannedBackend;
pub use http::HttpBackend;
pub use turn::spawn_turn;
pub use types::{AnalysisRequest, ChatRequest, ChatResponse, HealthResponse, HistoryMessage};
