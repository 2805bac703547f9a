//! Error types for import/export of Bible documents.

use thiserror::Error;

use crate::bible::BibleError;

/// Errors that can occur while reading or writing persisted Bibles.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The document is not valid JSON or does not have the expected shape.
    #[error("invalid bible document: {0}\n  Suggestion: Check that the file was written by bible-extractor")]
    Json(#[from] serde_json::Error),

    /// A chapter or verse key is not an integer.
    #[error("invalid {what} number '{value}' in book '{book}'")]
    InvalidNumber {
        /// `"chapter"` or `"verse"`
        what: &'static str,
        /// The offending key
        value: String,
        /// Book the key belongs to
        book: String,
    },

    /// Replaying the document violated a storage invariant.
    #[error("inconsistent bible document: {0}")]
    Storage(#[from] BibleError),

    /// Writing the output failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    #[must_use]
    pub fn invalid_number(what: &'static str, value: &str, book: &str) -> Self {
        Self::InvalidNumber {
            what,
            value: value.to_string(),
            book: book.to_string(),
        }
    }
}
