//! # Core Application Logic
//!
//! This module contains Dialogix's business logic.
//! It knows nothing about any specific UI technology or transport.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Persona registry     │
//!                    │  • Session (state)      │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │  Backend   │
//!           │  Adapter   │              │ (reqwest / │
//!           │ (ratatui)  │              │  canned)   │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`persona`]: the static persona registry and per-persona scripts
//! - [`message`]: `Message`, `MessageId`, `Role`
//! - [`analysis`]: NLP analysis types and the debug panel summary
//! - [`state`]: the `Session` struct, all conversation state in one place
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`upload`]: reading text files for submission
//! - [`config`]: layered configuration

pub mod action;
pub mod analysis;
pub mod config;
pub mod message;
pub mod persona;
pub mod state;
pub mod upload;
