//! Background worker that reads contacts files.
//!
//! The Zellij-facing half (receiving and posting messages) lives in the plugin
//! binary; this type holds the logic so it can be driven directly from tests.

use crate::domain::error::{Result, ZontactsError};
use crate::source::{ContactSource, JsonFileSource};
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Worker state.
///
/// Zellij constructs the worker through `Default` + serde, so sources are
/// skipped during serialization. The file source is built from each request's
/// path and kept until a request names a different file.
#[derive(Serialize, Deserialize, Default)]
pub struct ContactsWorker {
    #[serde(skip)]
    fixed: Option<Box<dyn ContactSource>>,
    #[serde(skip)]
    file: Option<JsonFileSource>,
}

impl ContactsWorker {
    /// Creates a worker that answers every request from `source`, ignoring
    /// the requested path.
    #[must_use]
    pub fn with_source(source: Box<dyn ContactSource>) -> Self {
        Self {
            fixed: Some(source),
            file: None,
        }
    }

    fn source_for(&mut self, path: PathBuf) -> Result<&dyn ContactSource> {
        if let Some(source) = self.fixed.as_deref() {
            return Ok(source);
        }

        if self.file.as_ref().map_or(true, |file| file.path() != path.as_path()) {
            tracing::debug!(path = ?path, "installing file source");
            self.file = Some(JsonFileSource::new(path));
        }

        self.file
            .as_ref()
            .map(|file| file as &dyn ContactSource)
            .ok_or_else(|| ZontactsError::Worker("contact source not initialized".to_string()))
    }

    fn handle_fetch(&mut self, path: PathBuf, mount_id: u64) -> WorkerResponse {
        let result = self.source_for(path).and_then(|source| {
            tracing::debug!(source = %source.describe(), "fetching contacts");
            source.fetch()
        });

        match result {
            Ok(contacts) => {
                tracing::debug!(mount_id, contact_count = contacts.len(), "contacts fetched");
                WorkerResponse::ContactsFetched { mount_id, contacts }
            }
            Err(e) => {
                tracing::warn!(mount_id, error = %e, "contacts fetch failed");
                WorkerResponse::FetchFailed {
                    mount_id,
                    message: e.to_string(),
                }
            }
        }
    }

    /// Joins the worker-side span to the trace of the request sender.
    ///
    /// The returned guard must be held while the request is handled.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let remote = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());

        Some(
            opentelemetry::Context::current()
                .with_remote_span_context(remote)
                .attach(),
        )
    }

    /// Handles one request.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);
        let _span = tracing::debug_span!("worker_handle_message", message_type = ?message).entered();

        match message {
            WorkerMessage::FetchContacts { path, mount_id, .. } => self.handle_fetch(path, mount_id),
        }
    }

    /// Handles a serialized request and returns the serialized response.
    ///
    /// Returns `None` if the payload is not a valid request or the response
    /// cannot be serialized; both are logged.
    pub fn handle_payload(&mut self, payload: &str) -> Option<String> {
        let message: WorkerMessage = match serde_json::from_str(payload) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker message");
                return None;
            }
        };

        let response = self.handle_message(message);

        serde_json::to_string(&response)
            .map_err(|e| tracing::debug!(error = %e, "failed to serialize worker response"))
            .ok()
    }
}
