//! Zellij plugin and worker implementations.
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: parse config, initialize tracing, create `AppState` for a new mount
//! 2. **Permissions**: once granted, the fetch starts (HTTP or worker)
//! 3. **Update**: map Zellij events to library events and execute the actions
//! 4. **Render**: lay out the visible window and draw it
//! 5. **Close**: `BeforeClose` tears the mount down so late outcomes are dropped
//!
//! # Event Mapping
//!
//! - `Key` → search input, cursor movement, toggle
//! - `Mouse(ScrollUp/ScrollDown)` → `Event::ScrollBy`
//! - `Mouse(LeftClick)` on a list line → `Event::ClickLine`
//! - `Timer` → `Event::Timer` (debounce poll)
//! - `WebRequestResult` → `Event::WebResponse`
//! - `CustomMessage` from the worker → `Event::WorkerResponse`
//! - `BeforeClose` → `Event::Teardown`
//!
//! # Keybindings
//!
//! Both modes:
//! - `Down`/`Ctrl+n`: Move down
//! - `Up`/`Ctrl+p`: Move up
//!
//! In normal mode:
//! - `j`/`k`: Move down/up
//! - `Space`/`Enter`: Toggle contact
//! - `/`: Focus search
//! - `PgDn`/`PgUp`: Page down/up
//! - `g`/`G` (or `Home`/`End`): First/last contact
//! - `q`: Hide plugin
//!
//! In search mode:
//! - Printable keys: Edit the term
//! - `Backspace`: Delete last character
//! - `Enter`: Back to the list, keeping the term
//! - `Esc`: Clear the term and go back to the list

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use zellij_tile::prelude::*;
use zellij_tile::shim::{post_message_to, post_message_to_plugin};
use zontacts::ui::components::list_line_at;
use zontacts::worker::{ContactsWorker, WorkerMessage, WorkerResponse, FETCH_MESSAGE};
use zontacts::{handle_event, Action, AppState, Config, Event, InputMode};

/// Name the worker is registered under (`contacts_worker` minus the suffix).
const WORKER_NAME: &str = "contacts";

/// Web request context key carrying the mount id of the request.
const MOUNT_ID_KEY: &str = "mount_id";

/// Plugin state wrapper.
///
/// Wraps the library's `AppState` with the pane height, which mouse events
/// need to find the list line under the pointer.
pub struct State {
    app: AppState,
    rows: usize,
}

impl Default for State {
    fn default() -> Self {
        Self {
            app: zontacts::initialize(&Config::default()),
            rows: 0,
        }
    }
}

impl ZellijPlugin for State {
    /// Parses configuration, starts a new mount and requests permissions.
    ///
    /// The fetch is deferred until `PermissionRequestResult` arrives.
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        zontacts::observability::init_tracing(&config);

        let _guard = tracing::debug_span!("plugin_load").entered();

        let mount_id = zontacts::now_ms();
        tracing::debug!(mount_id, source = ?config.source(), "parsed configuration");
        self.app = zontacts::initialize(&config).with_mount_id(mount_id);

        request_permission(&[PermissionType::WebAccess]);

        subscribe(&[
            EventType::Key,
            EventType::Mouse,
            EventType::Timer,
            EventType::CustomMessage,
            EventType::WebRequestResult,
            EventType::PermissionRequestResult,
            EventType::BeforeClose,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::event_name(&event);
        let span_name = format!("plugin_update::{event_name}");
        let span = tracing::debug_span!("plugin_update_event", otel.name = %span_name, event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => self.map_key_event(key),
            zellij_tile::prelude::Event::Mouse(mouse) => self.map_mouse_event(&mouse),
            zellij_tile::prelude::Event::Timer(_) => Some(Event::Timer),
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                Self::map_web_result(status, body, &context)
            }
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                Self::map_custom_message_event(&message, &payload)
            }
            zellij_tile::prelude::Event::PermissionRequestResult(status) => match status {
                PermissionStatus::Granted => Some(Event::PermissionsGranted),
                PermissionStatus::Denied => Some(Event::PermissionsDenied),
            },
            zellij_tile::prelude::Event::BeforeClose => Some(Event::Teardown),
            _ => None,
        };

        let Some(our_event) = our_event else {
            return false;
        };

        match handle_event(&mut self.app, &our_event, zontacts::now_ms()) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                for action in &actions {
                    Self::execute_action(action);
                }
                should_render
            }
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        zontacts::ui::render(&mut self.app, rows, cols);
    }
}

impl State {
    fn event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::Mouse(..) => "Mouse".to_string(),
            zellij_tile::prelude::Event::Timer(..) => "Timer".to_string(),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => format!("WebRequestResult({status})"),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
            zellij_tile::prelude::Event::BeforeClose => "BeforeClose".to_string(),
            _ => "Other".to_string(),
        }
    }

    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, mode = ?self.app.input_mode, "key event");

        if key.has_modifiers(&[KeyModifier::Ctrl]) {
            return match key.bare_key {
                BareKey::Char('n') => Some(Event::CursorDown),
                BareKey::Char('p') => Some(Event::CursorUp),
                _ => None,
            };
        }

        match (&self.app.input_mode, &key.bare_key) {
            (_, BareKey::Down) => Some(Event::CursorDown),
            (_, BareKey::Up) => Some(Event::CursorUp),

            (InputMode::Search, BareKey::Enter) => Some(Event::ConfirmSearch),
            (InputMode::Search, BareKey::Esc) => Some(Event::CancelSearch),
            (InputMode::Search, BareKey::Backspace) => Some(Event::Backspace),
            (InputMode::Search, BareKey::Char(c)) => Some(Event::Char(*c)),

            (InputMode::Normal, BareKey::Char('j')) => Some(Event::CursorDown),
            (InputMode::Normal, BareKey::Char('k')) => Some(Event::CursorUp),
            (InputMode::Normal, BareKey::Char(' ') | BareKey::Enter) => Some(Event::ToggleCursor),
            (InputMode::Normal, BareKey::Char('/')) => Some(Event::FocusSearch),
            (InputMode::Normal, BareKey::PageDown) => Some(Event::PageDown),
            (InputMode::Normal, BareKey::PageUp) => Some(Event::PageUp),
            (InputMode::Normal, BareKey::Char('g') | BareKey::Home) => Some(Event::First),
            (InputMode::Normal, BareKey::Char('G') | BareKey::End) => Some(Event::Last),
            (InputMode::Normal, BareKey::Char('q')) => Some(Event::CloseFocus),
            _ => None,
        }
    }

    fn map_mouse_event(&self, mouse: &Mouse) -> Option<Event> {
        match *mouse {
            Mouse::ScrollUp(lines) => Some(Event::ScrollBy(-i64::try_from(lines).unwrap_or(i64::MAX))),
            Mouse::ScrollDown(lines) => Some(Event::ScrollBy(i64::try_from(lines).unwrap_or(i64::MAX))),
            Mouse::LeftClick(line, _column) => {
                let list_line = list_line_at(line, self.rows);
                tracing::debug!(line, list_line = ?list_line, "left click");
                list_line.map(Event::ClickLine)
            }
            _ => None,
        }
    }

    fn map_web_result(status: u16, body: Vec<u8>, context: &BTreeMap<String, String>) -> Option<Event> {
        let Some(mount_id) = context.get(MOUNT_ID_KEY).and_then(|id| id.parse().ok()) else {
            tracing::debug!(status, "web response without a mount id, ignoring");
            return None;
        };

        tracing::debug!(status, mount_id, body_len = body.len(), "web response");
        Some(Event::WebResponse { status, body, mount_id })
    }

    fn map_custom_message_event(message: &str, payload: &str) -> Option<Event> {
        if message != FETCH_MESSAGE {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }

        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => Some(Event::WorkerResponse(response)),
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    fn post_worker_message(message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(WORKER_NAME.to_string()),
                    name: FETCH_MESSAGE.to_string(),
                    payload,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker message");
            }
        }
    }

    #[tracing::instrument(level = "debug")]
    fn execute_action(action: &Action) {
        match action {
            Action::CloseFocus => hide_self(),
            Action::PostToWorker(message) => Self::post_worker_message(message),
            Action::FetchUrl { url, mount_id } => {
                let context = BTreeMap::from([(MOUNT_ID_KEY.to_string(), mount_id.to_string())]);
                web_request(url, HttpVerb::Get, BTreeMap::new(), vec![], context);
            }
            Action::ScheduleTimer { after_ms } => {
                set_timeout(Duration::from_millis(*after_ms).as_secs_f64());
            }
        }
    }
}

/// Tracks whether the worker thread has installed its subscriber.
static WORKER_TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Worker registered with Zellij; forwards requests to [`ContactsWorker`].
#[derive(Default, Serialize, Deserialize)]
pub struct ContactsWorkerShim {
    worker: ContactsWorker,
}

impl ZellijWorker<'_> for ContactsWorkerShim {
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.swap(true, Ordering::Relaxed) {
            zontacts::observability::init_tracing(&Config::default());
        }

        if let Some(payload) = self.worker.handle_payload(&payload) {
            post_message_to_plugin(PluginMessage {
                name: message,
                payload,
                worker_name: None,
            });
        }
    }
}
