//! Error types for site extractors.
//!
//! Data anomalies inside a page never show up here; they become warnings on
//! the extracted Bible. These errors abort one extraction.

use thiserror::Error;

use crate::bible::BibleError;

/// Errors that can occur while extracting a Bible from a website.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// No registered extractor matches the identifier
    #[error("unknown source '{identifier}'\n  Suggestion: Run `bible-extractor list` to see registered sources")]
    UnknownSource {
        /// URL, name or index that was looked up
        identifier: String,
    },

    /// A request failed or returned a non-success status
    #[error("request to '{url}' failed: {reason}\n  Suggestion: Check network connectivity and retry")]
    Http {
        /// URL being fetched
        url: String,
        /// Transport error or status line
        reason: String,
    },

    /// A page is missing structure every extraction depends on
    #[error("cannot parse '{url}': {reason}\n  Suggestion: The site layout may have changed")]
    Parse {
        /// Page that could not be parsed
        url: String,
        /// What was missing
        reason: String,
    },

    /// Storing a scraped verse violated a storage invariant
    #[error("{source_name}: {error}")]
    Bible {
        /// Extractor that produced the verse
        source_name: String,
        /// Underlying storage error
        error: BibleError,
    },
}

impl ExtractError {
    #[must_use]
    pub fn unknown_source(identifier: &str) -> Self {
        Self::UnknownSource {
            identifier: identifier.to_string(),
        }
    }

    #[must_use]
    pub fn http(url: &str, reason: impl ToString) -> Self {
        Self::Http {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn parse(url: &str, reason: &str) -> Self {
        Self::Parse {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn bible(source_name: &str, error: BibleError) -> Self {
        Self::Bible {
            source_name: source_name.to_string(),
            error,
        }
    }
}
