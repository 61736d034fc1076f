//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the views,
//! and translates keyboard events into core `Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Views
//!
//! - **Home**: the persona picker. Enter opens a chat.
//! - **Chat**: one conversation. Esc returns Home and discards it.
//!
//! ## Redraw Strategy
//!
//! The loop redraws only when something changed: an input event, a turn
//! result, or the health probe finishing. While a reply is pending it polls
//! faster so results show up promptly.

mod chat;
mod component;
mod components;
mod event;
mod theme;
mod ui;

use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{info, warn};
use tokio::sync::oneshot;

use crate::backend::{BackendError, CannedBackend, HealthResponse, HttpBackend, PersonaBackend};
use crate::core::config::ResolvedConfig;
use crate::core::persona;
use crate::tui::chat::{ChatEvent, ChatView};
use crate::tui::component::EventHandler;
use crate::tui::components::{PersonaPickerState, PickerEvent};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const IDLE_POLL: Duration = Duration::from_millis(250);
const BUSY_POLL: Duration = Duration::from_millis(50);

pub enum View {
    Home(PersonaPickerState),
    Chat(Box<ChatView>),
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Build the backend the config asks for.
///
/// Also returns the HTTP backend separately when there is one, for the
/// startup health probe.
pub fn build_backend(config: &ResolvedConfig) -> (Arc<dyn PersonaBackend>, Option<HttpBackend>) {
    if config.offline {
        info!("Using canned offline backend");
        return (Arc::new(CannedBackend::new()), None);
    }
    info!(
        "Using HTTP backend (chat={}, nlp={})",
        config.chat_base_url, config.nlp_base_url
    );
    let http = HttpBackend::new(config.chat_base_url.clone(), config.nlp_base_url.clone());
    (Arc::new(http.clone()), Some(http))
}

/// Status line text for a finished health probe.
fn health_status(result: &Result<HealthResponse, BackendError>) -> String {
    match result {
        Ok(health) if health.status.is_empty() => "Backend online".to_string(),
        Ok(health) => format!("Backend {}", health.status),
        Err(e) => format!("Backend offline ({e}); replies will fall back"),
    }
}

fn spawn_health_probe(http: HttpBackend) -> oneshot::Receiver<String> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let result = http.health().await;
        match &result {
            Ok(health) => info!("Health probe: {} ({})", health.status, health.message),
            Err(e) => warn!("Health probe failed: {}", e),
        }
        let _ = tx.send(health_status(&result));
    });
    rx
}

/// The view to start in: a chat when a persona was requested, else Home.
///
/// An unknown id falls back to the first persona; the returned notice says so.
fn initial_view(
    requested: Option<&str>,
    backend: &Arc<dyn PersonaBackend>,
) -> (View, Option<String>) {
    let Some(id) = requested else {
        return (View::Home(PersonaPickerState::new()), None);
    };
    let persona = persona::get(id);
    let notice = if persona::find(id).is_none() {
        warn!("Unknown persona '{}', falling back to {}", id, persona.id);
        Some(format!("Unknown persona '{id}', showing {}", persona.name))
    } else {
        None
    };
    let mut chat = ChatView::open(persona, backend.clone());
    if let Some(notice) = &notice {
        chat.session.status_message = notice.clone();
    }
    (View::Chat(Box::new(chat)), notice)
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let (backend, http) = build_backend(&config);
    let mut health_rx = http.map(spawn_health_probe);
    let mut home_status = if config.offline {
        "Offline demo mode: canned replies, no analysis".to_string()
    } else {
        "Checking backend...".to_string()
    };

    let (mut view, notice) = initial_view(config.persona.as_deref(), &backend);
    if let Some(notice) = notice {
        home_status = notice;
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();
    let mut needs_redraw = true;

    loop {
        if let View::Chat(chat) = &mut view {
            chat.sync_props();
        }

        if needs_redraw {
            terminal.draw(|f| match &mut view {
                View::Home(picker) => ui::draw_home(f, picker, &home_status),
                View::Chat(chat) => ui::draw_chat(f, chat),
            })?;
            needs_redraw = false;
        }

        let busy = matches!(&view, View::Chat(chat) if chat.session.is_loading());
        let first_event = poll_event_timeout(if busy { BUSY_POLL } else { IDLE_POLL });
        if first_event.is_some() {
            needs_redraw = true;
        }

        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                TuiEvent::Resize => continue,
                TuiEvent::Quit => {
                    should_quit = true;
                    break;
                }
                _ => {}
            }

            let next = match &mut view {
                View::Home(picker) => match picker.handle_event(&event) {
                    Some(PickerEvent::Open(persona)) => {
                        Some(View::Chat(Box::new(ChatView::open(persona, backend.clone()))))
                    }
                    Some(PickerEvent::Quit) => {
                        should_quit = true;
                        None
                    }
                    None => None,
                },
                View::Chat(chat) => match chat.handle_event(&event) {
                    Some(ChatEvent::Leave) => {
                        let mut picker = PersonaPickerState::new();
                        picker.select_id(chat.session.persona.id);
                        Some(View::Home(picker))
                    }
                    Some(ChatEvent::Quit) => {
                        should_quit = true;
                        None
                    }
                    None => None,
                },
            };
            if let Some(next) = next {
                // Replacing a chat drops it, which aborts its tasks
                view = next;
            }
            if should_quit {
                break;
            }
        }

        if should_quit {
            break;
        }

        if let View::Chat(chat) = &mut view
            && chat.drain_results()
        {
            needs_redraw = true;
        }

        if let Some(rx) = &mut health_rx
            && let Ok(status) = rx.try_recv()
        {
            home_status = status;
            health_rx = None;
            needs_redraw = true;
        }
    }

    info!("Shutting down");
    drop(view);
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedBackend;

    fn backend() -> Arc<dyn PersonaBackend> {
        Arc::new(ScriptedBackend::replying("x"))
    }

    #[test]
    fn no_persona_starts_home() {
        let (view, notice) = initial_view(None, &backend());
        assert!(matches!(view, View::Home(_)));
        assert!(notice.is_none());
    }

    #[tokio::test]
    async fn known_persona_opens_chat() {
        let (view, notice) = initial_view(Some("zen"), &backend());
        match view {
            View::Chat(chat) => assert_eq!(chat.session.persona.id, "zen"),
            View::Home(_) => panic!("expected chat"),
        }
        assert!(notice.is_none());
    }

    #[tokio::test]
    async fn unknown_persona_falls_back_with_notice() {
        let (view, notice) = initial_view(Some("pirate-king"), &backend());
        match view {
            View::Chat(chat) => {
                assert_eq!(chat.session.persona.id, persona::list()[0].id);
                assert!(chat.session.status_message.contains("pirate-king"));
            }
            View::Home(_) => panic!("expected chat"),
        }
        assert_eq!(
            notice.as_deref(),
            Some("Unknown persona 'pirate-king', showing Captain Grumblebeard")
        );
    }

    #[test]
    fn health_status_lines() {
        let ok = Ok(HealthResponse {
            message: "Persona Chat API".to_string(),
            status: "online".to_string(),
        });
        assert_eq!(health_status(&ok), "Backend online");
        let err = Err(BackendError::Network("connection refused".to_string()));
        assert!(health_status(&err).starts_with("Backend offline"));
    }

    #[test]
    fn offline_config_builds_canned_backend() {
        let config = ResolvedConfig {
            persona: None,
            offline: true,
            chat_base_url: "http://127.0.0.1:8000".to_string(),
            nlp_base_url: "http://127.0.0.1:8001".to_string(),
        };
        let (backend, http) = build_backend(&config);
        assert_eq!(backend.name(), "canned");
        assert!(http.is_none());
    }
}
