//! Contact sources.
//!
//! Contacts come either from an HTTP endpoint, fetched by the plugin host on
//! behalf of the plugin, or from a JSON file read on the background worker.
//!
//! # Modules
//!
//! - `backend`: [`ContactSource`] trait and an in-memory source
//! - `json`: payload parsing and the file-backed source
//! - `http`: turning HTTP responses into records

pub mod backend;
pub mod http;
pub mod json;

pub use backend::{ContactSource, StaticSource};
pub use http::records_from_response;
pub use json::{parse_contacts, JsonFileSource};

use std::path::PathBuf;

/// Where the plugin loads contacts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// HTTP GET against this URL.
    Url(String),
    /// JSON file on the host filesystem.
    File(PathBuf),
}
