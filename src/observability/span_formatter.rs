//! OTLP JSON span encoding.
//!
//! Each exported batch becomes one OTLP/JSON `ExportTraceServiceRequest`
//! document on a single line, so the trace file can be fed to any OTLP JSON
//! consumer line by line. The document shape is modelled with serde types
//! rather than assembled by hand.

use opentelemetry::trace::{Event, Link, SpanId, SpanKind, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::resource::Resource;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Instrumentation scope name written into every batch.
pub const SCOPE_NAME: &str = "zontacts";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TraceDocument {
    resource_spans: Vec<ResourceSpans>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceSpans {
    resource: OtlpResource,
    scope_spans: Vec<ScopeSpans>,
}

#[derive(Serialize)]
struct OtlpResource {
    attributes: Vec<Attribute>,
}

#[derive(Serialize)]
struct ScopeSpans {
    scope: Scope,
    spans: Vec<OtlpSpan>,
}

#[derive(Serialize)]
struct Scope {
    name: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OtlpSpan {
    trace_id: String,
    span_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    parent_span_id: String,
    name: String,
    kind: u8,
    start_time_unix_nano: String,
    end_time_unix_nano: String,
    attributes: Vec<Attribute>,
    events: Vec<OtlpEvent>,
    links: Vec<OtlpLink>,
    status: OtlpStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OtlpEvent {
    time_unix_nano: String,
    name: String,
    attributes: Vec<Attribute>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OtlpLink {
    trace_id: String,
    span_id: String,
    attributes: Vec<Attribute>,
}

#[derive(Serialize)]
struct OtlpStatus {
    code: u8,
    #[serde(skip_serializing_if = "String::is_empty")]
    message: String,
}

#[derive(Serialize)]
struct Attribute {
    key: String,
    value: AnyValue,
}

/// OTLP `AnyValue`; 64-bit integers are strings in OTLP/JSON.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum AnyValue {
    BoolValue(bool),
    IntValue(String),
    DoubleValue(f64),
    StringValue(String),
}

pub struct SpanFormatter {
    resource: Resource,
}

impl SpanFormatter {
    pub const fn new(resource: Resource) -> Self {
        Self { resource }
    }

    /// Encodes `batch` as a single-line OTLP JSON document.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if encoding fails.
    pub fn format_batch(&self, batch: &[SpanData]) -> serde_json::Result<String> {
        let attributes = self
            .resource
            .iter()
            .map(|(key, value)| Attribute {
                key: key.to_string(),
                value: any_value(value),
            })
            .collect();

        let document = TraceDocument {
            resource_spans: vec![ResourceSpans {
                resource: OtlpResource { attributes },
                scope_spans: vec![ScopeSpans {
                    scope: Scope {
                        name: SCOPE_NAME,
                        version: env!("CARGO_PKG_VERSION"),
                    },
                    spans: batch.iter().map(span).collect(),
                }],
            }],
        };

        serde_json::to_string(&document)
    }
}

impl std::fmt::Debug for SpanFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanFormatter").finish_non_exhaustive()
    }
}

fn span(data: &SpanData) -> OtlpSpan {
    let parent_span_id = if data.parent_span_id == SpanId::INVALID {
        String::new()
    } else {
        format!("{:016x}", data.parent_span_id)
    };

    let (code, message) = match &data.status {
        Status::Unset => (0, String::new()),
        Status::Ok => (1, String::new()),
        Status::Error { description } => (2, description.to_string()),
    };

    OtlpSpan {
        trace_id: format!("{:032x}", data.span_context.trace_id()),
        span_id: format!("{:016x}", data.span_context.span_id()),
        parent_span_id,
        name: data.name.to_string(),
        kind: span_kind(&data.span_kind),
        start_time_unix_nano: unix_nanos(data.start_time),
        end_time_unix_nano: unix_nanos(data.end_time),
        attributes: attributes(&data.attributes),
        events: events(&data.events),
        links: links(&data.links),
        status: OtlpStatus { code, message },
    }
}

const fn span_kind(kind: &SpanKind) -> u8 {
    match kind {
        SpanKind::Internal => 1,
        SpanKind::Server => 2,
        SpanKind::Client => 3,
        SpanKind::Producer => 4,
        SpanKind::Consumer => 5,
    }
}

fn unix_nanos(time: SystemTime) -> String {
    time.duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or(0)
        .to_string()
}

fn attributes(pairs: &[KeyValue]) -> Vec<Attribute> {
    pairs
        .iter()
        .map(|kv| Attribute {
            key: kv.key.to_string(),
            value: any_value(&kv.value),
        })
        .collect()
}

fn any_value(value: &Value) -> AnyValue {
    match value {
        Value::Bool(b) => AnyValue::BoolValue(*b),
        Value::I64(i) => AnyValue::IntValue(i.to_string()),
        Value::F64(f) => AnyValue::DoubleValue(*f),
        Value::String(s) => AnyValue::StringValue(s.to_string()),
        // Arrays are flattened to their display form.
        Value::Array(_) => AnyValue::StringValue(value.to_string()),
    }
}

fn events(events: &[Event]) -> Vec<OtlpEvent> {
    events
        .iter()
        .map(|event| OtlpEvent {
            time_unix_nano: unix_nanos(event.timestamp),
            name: event.name.to_string(),
            attributes: attributes(&event.attributes),
        })
        .collect()
}

fn links(links: &[Link]) -> Vec<OtlpLink> {
    links
        .iter()
        .map(|link| OtlpLink {
            trace_id: format!("{:032x}", link.span_context.trace_id()),
            span_id: format!("{:016x}", link.span_context.span_id()),
            attributes: attributes(&link.attributes),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_carries_resource_and_scope() {
        let resource = Resource::new(vec![KeyValue::new("service.name", "zontacts")]);
        let formatter = SpanFormatter::new(resource);

        let line = formatter.format_batch(&[]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();

        let resource_spans = &json["resourceSpans"][0];
        let attributes = resource_spans["resource"]["attributes"].as_array().unwrap();
        assert!(attributes.iter().any(|attr| attr["key"] == "service.name"
            && attr["value"]["stringValue"] == "zontacts"));
        assert_eq!(resource_spans["scopeSpans"][0]["scope"]["name"], SCOPE_NAME);
        assert!(resource_spans["scopeSpans"][0]["spans"].as_array().unwrap().is_empty());
        assert!(!line.contains('\n'));
    }

    #[test]
    fn values_use_otlp_json_encoding() {
        let encoded = serde_json::to_value(attributes(&[
            KeyValue::new("count", 3_i64),
            KeyValue::new("ok", true),
        ]))
        .unwrap();

        assert_eq!(encoded[0]["value"]["intValue"], "3");
        assert_eq!(encoded[1]["value"]["boolValue"], true);
    }
}
