//! JSON contact payloads and the file-backed source.
//!
//! Two payload shapes are accepted:
//!
//! ```json
//! [{ "id": 1, "first_name": "Egor", "last_name": "Emelyanov", "avatar": "https://..." }]
//! ```
//!
//! or the same array wrapped in an object under `data`, as returned by
//! paginated-looking REST APIs:
//!
//! ```json
//! { "page": 1, "data": [{ "id": 1, "first_name": "Egor", "last_name": "Emelyanov", "avatar": "" }] }
//! ```

use crate::domain::error::{Result, ZontactsError};
use crate::domain::ContactRecord;
use crate::source::backend::ContactSource;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    List(Vec<ContactRecord>),
    Wrapped { data: Vec<ContactRecord> },
}

/// Parses a contacts payload.
///
/// # Errors
///
/// Returns [`ZontactsError::Parse`] if the bytes are not JSON or match neither
/// accepted shape.
///
/// # Examples
///
/// ```
/// use zontacts::source::parse_contacts;
///
/// let records = parse_contacts(br#"{"data": [{"id": 2, "first_name": "Anna", "last_name": "Ivanova", "avatar": ""}]}"#)?;
/// assert_eq!(records[0].first_name, "Anna");
/// # Ok::<(), zontacts::ZontactsError>(())
/// ```
pub fn parse_contacts(bytes: &[u8]) -> Result<Vec<ContactRecord>> {
    match serde_json::from_slice::<Payload>(bytes) {
        Ok(Payload::List(records) | Payload::Wrapped { data: records }) => Ok(records),
        Err(e) => Err(ZontactsError::Parse(format!(
            "expected a contact array or an object with a `data` array: {e}"
        ))),
    }
}

/// Reads contacts from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ContactSource for JsonFileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn fetch(&self) -> Result<Vec<ContactRecord>> {
        tracing::debug!(path = ?self.path, "reading contacts file");

        let bytes = std::fs::read(&self.path)?;
        let records = parse_contacts(&bytes)?;

        tracing::debug!(record_count = records.len(), "contacts file parsed");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn accepts_bare_array_and_wrapped_data() {
        let bare = parse_contacts(br#"[{"id": 1, "first_name": "Egor", "last_name": "Emelyanov", "avatar": "a"}]"#).unwrap();
        let wrapped = parse_contacts(
            br#"{"page": 1, "total": 1, "data": [{"id": 1, "email": "e@x", "first_name": "Egor", "last_name": "Emelyanov", "avatar": "a"}]}"#,
        )
        .unwrap();
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn empty_array_is_a_valid_payload() {
        assert!(parse_contacts(b"[]").unwrap().is_empty());
        assert!(parse_contacts(br#"{"data": []}"#).unwrap().is_empty());
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(matches!(parse_contacts(b"not json"), Err(ZontactsError::Parse(_))));
        assert!(matches!(parse_contacts(br#"{"items": []}"#), Err(ZontactsError::Parse(_))));
        assert!(matches!(parse_contacts(br#"[{"first_name": "No id"}]"#), Err(ZontactsError::Parse(_))));
    }

    #[test]
    fn file_source_reads_contacts() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 1, "first_name": "Egor", "last_name": "Emelyanov", "avatar": ""}},
                {{"id": "2", "first_name": "Anna", "last_name": "Ivanova", "avatar": ""}}]"#
        )
        .unwrap();

        let source = JsonFileSource::new(file.path().to_path_buf());
        let records = source.fetch().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id.as_str(), "2");
        assert!(source.describe().starts_with("file "));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("contacts.json"));
        assert!(matches!(source.fetch(), Err(ZontactsError::Io(_))));
    }
}
