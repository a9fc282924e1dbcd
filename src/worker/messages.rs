//! Messages exchanged between the plugin and its background worker.
//!
//! The worker reads contacts files off the render thread. Every request carries
//! the mount id it was issued for, which the response echoes back so the plugin
//! can drop outcomes that belong to an earlier mount.

use crate::domain::ContactRecord;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name under which requests are posted to the worker and responses come back.
pub const FETCH_MESSAGE: &str = "fetch_contacts";

/// OpenTelemetry identifiers of the span that sent a message.
///
/// Lets spans recorded on the worker join the trace of the plugin-side span
/// that triggered them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// Trace id as 32 hex digits.
    pub trace_id: String,
    /// Span id as 16 hex digits.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the context of the current span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the span is
    /// not recorded.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span = otel_context.span();
        let span_context = span.span_context();

        if !span_context.is_valid() {
            tracing::trace!("no valid span context to propagate");
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates constructors that stamp the current trace context onto a request.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Builds a `", stringify!($variant), "` request carrying the current trace context.")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    fetch_contacts(FetchContacts { path: PathBuf, mount_id: u64 }),
}

/// Requests from the plugin to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read and parse the contacts file at `path`.
    FetchContacts {
        path: PathBuf,
        mount_id: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    #[must_use]
    pub fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::FetchContacts { trace_context, .. } => trace_context.as_ref(),
        }
    }
}

/// Responses from the worker to the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// The contacts file was read.
    ContactsFetched {
        mount_id: u64,
        contacts: Vec<ContactRecord>,
    },

    /// The contacts file could not be read or parsed.
    FetchFailed { mount_id: u64, message: String },
}

impl WorkerResponse {
    /// Mount id of the request this responds to.
    #[must_use]
    pub fn mount_id(&self) -> u64 {
        match self {
            Self::ContactsFetched { mount_id, .. } | Self::FetchFailed { mount_id, .. } => *mount_id,
        }
    }
}
