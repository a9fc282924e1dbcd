//! Tracing subscriber setup.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name reported in the trace resource.
pub const SERVICE_NAME: &str = "zontacts";

const TRACE_FILE_NAME: &str = "zontacts-otlp.json";

const DEFAULT_LEVEL: &str = "info";

/// Path of the OTLP trace file inside the plugin sandbox.
#[must_use]
pub fn trace_file_path() -> PathBuf {
    crate::infrastructure::data_dir().join(TRACE_FILE_NAME)
}

/// Installs the global subscriber: an `EnvFilter` built from
/// `config.trace_level` (default `info`) feeding an OpenTelemetry layer that
/// exports to [`trace_file_path`].
///
/// Tracing is optional: if the data directory cannot be created or a subscriber
/// is already installed, nothing happens. Returns whether this call installed
/// the subscriber.
pub fn init_tracing(config: &Config) -> bool {
    let level = config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL);

    let trace_file = trace_file_path();
    if let Some(dir) = trace_file.parent() {
        if std::fs::create_dir_all(dir).is_err() {
            return false;
        }
    }

    let resource = Resource::new(vec![
        KeyValue::new("service.name", SERVICE_NAME),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = tracer::create_tracer_provider(trace_file, resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init()
        .is_ok()
}
