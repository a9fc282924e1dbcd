//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place where events turn into state changes. It
//! returns whether the plugin should re-render and the side effects to perform.
//!
//! # Event Types
//!
//! - **Lifecycle**: `PermissionsGranted`, `PermissionsDenied`, `Teardown`, `CloseFocus`
//! - **Fetch outcomes**: `WebResponse`, `WorkerResponse`
//! - **Search**: `FocusSearch`, `Char`, `Backspace`, `ConfirmSearch`, `CancelSearch`, `Timer`
//! - **Navigation**: `CursorDown`, `CursorUp`, `PageDown`, `PageUp`, `First`, `Last`, `ScrollBy`
//! - **Selection**: `ToggleCursor`, `ClickLine`
//!
//! # Example
//!
//! ```
//! use zontacts::app::{handle_event, AppState, Event};
//! use zontacts::ui::Theme;
//!
//! let mut state = AppState::new(Theme::default());
//! let (should_render, actions) = handle_event(&mut state, &Event::CursorDown, 0)?;
//! assert!(should_render);
//! assert!(actions.is_empty());
//! # Ok::<(), zontacts::ZontactsError>(())
//! ```

use crate::app::modes::{InputMode, LoadPhase};
use crate::app::{Action, AppState};
use crate::domain::error::{Result, ZontactsError};
use crate::source::records_from_response;
use crate::worker::WorkerResponse;

/// Events delivered by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The host granted the requested permissions; the fetch may start.
    PermissionsGranted,
    /// The host denied permissions; the fetch can never run.
    PermissionsDenied,
    /// The plugin is closing.
    Teardown,
    /// Hides the plugin pane.
    CloseFocus,

    /// Result of the HTTP request issued for `mount_id`.
    WebResponse { status: u16, body: Vec<u8>, mount_id: u64 },
    /// Reply from the background worker.
    WorkerResponse(WorkerResponse),

    /// Moves keyboard focus into the search bar.
    FocusSearch,
    /// Leaves the search bar keeping the term.
    ConfirmSearch,
    /// Leaves the search bar and clears the term.
    CancelSearch,
    /// Appends a character to the search term.
    Char(char),
    /// Removes the last character of the search term.
    Backspace,
    /// A debounce timer elapsed.
    Timer,

    CursorDown,
    CursorUp,
    PageDown,
    PageUp,
    First,
    Last,
    /// Scrolls the list by this many lines (negative is up).
    ScrollBy(i64),

    /// Toggles the contact under the cursor.
    ToggleCursor,
    /// Toggles the contact drawn on this line of the list viewport.
    ClickLine(usize),
}

/// Processes an event, mutates application state and returns actions to execute.
///
/// `now_ms` is the current wall-clock time in milliseconds and drives the search
/// debounce.
///
/// # Errors
///
/// Failures of the fetch are absorbed into the state (the list degrades to the
/// empty state) rather than returned; the `Result` is reserved for failures of
/// the handler itself.
pub fn handle_event(state: &mut AppState, event: &Event, now_ms: u64) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::PermissionsGranted => match state.start_fetch() {
            Ok(actions) => Ok((false, actions)),
            Err(e) => {
                state.load_failed(&e);
                Ok((true, vec![]))
            }
        },
        Event::PermissionsDenied => {
            if state.phase == LoadPhase::Loaded || state.torn_down {
                return Ok((false, vec![]));
            }
            state.load_failed(&ZontactsError::Source("permissions denied".to_string()));
            Ok((true, vec![]))
        }
        Event::Teardown => {
            state.teardown();
            Ok((false, vec![]))
        }
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),

        Event::WebResponse { status, body, mount_id } => {
            if !state.accepts_outcome(*mount_id) {
                return Ok((false, vec![]));
            }
            tracing::debug!(status, body_len = body.len(), "http response received");

            match records_from_response(*status, body) {
                Ok(records) => state.load_succeeded(records),
                Err(e) => state.load_failed(&e),
            }
            Ok((true, vec![]))
        }
        Event::WorkerResponse(response) => {
            if !state.accepts_outcome(response.mount_id()) {
                return Ok((false, vec![]));
            }

            match response {
                WorkerResponse::ContactsFetched { contacts, .. } => state.load_succeeded(contacts.clone()),
                WorkerResponse::FetchFailed { message, .. } => {
                    state.load_failed(&ZontactsError::Worker(message.clone()));
                }
            }
            Ok((true, vec![]))
        }

        Event::FocusSearch => {
            state.focus_search();
            Ok((true, vec![]))
        }
        Event::ConfirmSearch => {
            state.confirm_search();
            Ok((true, vec![]))
        }
        Event::CancelSearch => {
            state.cancel_search();
            Ok((true, vec![]))
        }
        Event::Char(c) => {
            if state.input_mode != InputMode::Search {
                return Ok((false, vec![]));
            }
            let actions = state.push_search_char(*c, now_ms);
            Ok((true, actions))
        }
        Event::Backspace => {
            if state.input_mode != InputMode::Search {
                return Ok((false, vec![]));
            }
            let actions = state.pop_search_char(now_ms);
            Ok((true, actions))
        }
        Event::Timer => Ok(state.poll_search(now_ms)),

        Event::CursorDown => {
            state.move_cursor(1);
            Ok((true, vec![]))
        }
        Event::CursorUp => {
            state.move_cursor(-1);
            Ok((true, vec![]))
        }
        Event::PageDown => {
            state.page_down();
            Ok((true, vec![]))
        }
        Event::PageUp => {
            state.page_up();
            Ok((true, vec![]))
        }
        Event::First => {
            state.cursor_first();
            Ok((true, vec![]))
        }
        Event::Last => {
            state.cursor_last();
            Ok((true, vec![]))
        }
        Event::ScrollBy(delta) => {
            state.scroll_by(*delta);
            Ok((true, vec![]))
        }

        Event::ToggleCursor => Ok((state.toggle_cursor(), vec![])),
        Event::ClickLine(line) => Ok((state.toggle_at_line(*line), vec![])),
    }
}
