//! Interpreting HTTP responses from a contacts endpoint.
//!
//! The request itself is issued by the plugin host; this module only decides
//! whether a completed response carries contacts.

use crate::domain::error::{Result, ZontactsError};
use crate::domain::ContactRecord;
use crate::source::json::parse_contacts;

/// Converts a completed HTTP response into contact records.
///
/// # Errors
///
/// Any non-2xx status is a [`ZontactsError::Source`]; a 2xx response with a
/// malformed body is a [`ZontactsError::Parse`].
pub fn records_from_response(status: u16, body: &[u8]) -> Result<Vec<ContactRecord>> {
    if !(200..300).contains(&status) {
        return Err(ZontactsError::Source(format!(
            "contacts endpoint returned HTTP {status}"
        )));
    }
    parse_contacts(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_status_parses_body() {
        let records = records_from_response(200, br#"{"data": [{"id": 1, "first_name": "Egor", "last_name": "Emelyanov", "avatar": ""}]}"#).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn non_success_status_is_a_source_error() {
        for status in [0u16, 199, 301, 404, 500] {
            assert!(matches!(records_from_response(status, b"[]"), Err(ZontactsError::Source(_))));
        }
    }
}
