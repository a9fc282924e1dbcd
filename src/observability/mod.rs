//! OpenTelemetry-based observability with file-based trace export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → JSON lines
//! ```
//!
//! - Traces go to `~/.local/share/zellij/zontacts/zontacts-otlp.json`
//!   (`/host/...` inside the sandbox)
//! - The file rotates at 10 MiB, keeping 3 numbered backups
//! - Every line is one OTLP/JSON document
//!
//! The filter comes from the `trace_level` plugin option and defaults to
//! `info`. Selection changes are logged at `info`, fetch failures at `error`,
//! and per-event spans at `debug`.
//!
//! # Modules
//!
//! - `init`: subscriber setup
//! - `tracer`: tracer provider with the file exporter
//! - `span_formatter`: OTLP JSON encoding
//! - `file_writer`: rotating file writer

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, trace_file_path, SERVICE_NAME};
