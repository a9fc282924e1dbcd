//! Side effects requested by the event handler.
//!
//! The handler never talks to Zellij. It returns a `Vec<Action>` and the plugin
//! runtime executes them in order after the state has been updated.

use crate::worker::WorkerMessage;

/// Commands to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Posts a message to the background worker.
    PostToWorker(WorkerMessage),

    /// Issues an HTTP GET for the contacts.
    ///
    /// The runtime attaches `mount_id` to the request context so the response
    /// can be matched to the mount that asked for it.
    FetchUrl { url: String, mount_id: u64 },

    /// Arms a timer that delivers [`Event::Timer`](crate::app::Event::Timer)
    /// after `after_ms` milliseconds.
    ScheduleTimer { after_ms: u64 },
}
