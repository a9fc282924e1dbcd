//! Contact source abstraction.
//!
//! A [`ContactSource`] delivers the full contact set in one call. There is no
//! pagination and no partial result: either every record comes back or the
//! call fails.

use crate::domain::error::Result;
use crate::domain::ContactRecord;

/// Something that can produce the contact set.
///
/// Implementations run on the background worker, so they must be `Send`.
///
/// # Implementations
///
/// - [`JsonFileSource`](crate::source::JsonFileSource): reads a JSON file
/// - [`StaticSource`](crate::source::StaticSource): serves records held in memory
pub trait ContactSource: Send {
    /// Short human-readable description used in logs.
    fn describe(&self) -> String;

    /// Fetches every contact, in source order.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or its payload cannot be
    /// parsed. Callers treat every error the same way.
    fn fetch(&self) -> Result<Vec<ContactRecord>>;
}

/// A source serving a fixed set of records.
///
/// Useful as a fallback and for exercising the load path without a filesystem.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<ContactRecord>,
}

impl StaticSource {
    #[must_use]
    pub fn new(records: Vec<ContactRecord>) -> Self {
        Self { records }
    }
}

impl ContactSource for StaticSource {
    fn describe(&self) -> String {
        format!("static ({} records)", self.records.len())
    }

    fn fetch(&self) -> Result<Vec<ContactRecord>> {
        Ok(self.records.clone())
    }
}
