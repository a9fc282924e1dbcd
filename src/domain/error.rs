//! Error types for the Zontacts plugin.
//!
//! This module defines the centralized error type [`ZontactsError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented with the
//! `thiserror` crate.
//!
//! None of these errors is fatal to the plugin: the application layer turns them
//! into diagnostics and, at worst, an empty contact list.

use thiserror::Error;

/// The main error type for Zontacts operations.
///
/// # Examples
///
/// ```
/// use zontacts::ZontactsError;
///
/// fn missing_source() -> Result<(), ZontactsError> {
///     Err(ZontactsError::Config("no contacts source configured".to_string()))
/// }
///
/// assert!(missing_source().is_err());
/// ```
#[derive(Debug, Error)]
pub enum ZontactsError {
    /// The contact source could not deliver contacts.
    ///
    /// Covers HTTP failures (non-2xx status) and sources that are not
    /// initialized. The string describes what went wrong.
    #[error("Source error: {0}")]
    Source(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A contacts payload was not valid JSON or had an unexpected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ZontactsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// A specialized `Result` type for Zontacts operations.
pub type Result<T> = std::result::Result<T, ZontactsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_become_parse_errors() {
        let err: ZontactsError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, ZontactsError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error:"));
    }

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn read() -> Result<String> {
            Ok(std::fs::read_to_string("/definitely/not/here/contacts.json")?)
        }
        assert!(matches!(read(), Err(ZontactsError::Io(_))));
    }
}
