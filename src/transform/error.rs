//! Error types for Bible transforms.

use thiserror::Error;

use crate::bible::BibleError;

/// Errors produced by transform lookup and application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// No transform is registered under the requested name.
    #[error("unknown function '{name}'\n  Suggestion: Run `bible-extractor list` to see available functions")]
    Unknown {
        /// The requested name
        name: String,
    },

    /// The transform needs a book the Bible does not contain.
    #[error("{transform}: book '{book}' not found")]
    MissingBook {
        /// Transform that failed
        transform: String,
        /// Missing book name
        book: String,
    },

    /// The transform needs a chapter or verse the Bible does not contain.
    #[error("{transform}: {location} not found")]
    MissingLocation {
        /// Transform that failed
        transform: String,
        /// Rendered location
        location: String,
    },

    /// Rebuilding the Bible violated a storage invariant.
    #[error("{transform}: {error}")]
    Storage {
        /// Transform that failed
        transform: String,
        /// Underlying storage error
        error: BibleError,
    },

    /// The transform panicked.
    #[error("{transform}: panicked while running")]
    Panicked {
        /// Transform that failed
        transform: String,
    },
}

impl TransformError {
    #[must_use]
    pub fn unknown(name: &str) -> Self {
        Self::Unknown {
            name: name.to_string(),
        }
    }

    #[must_use]
    pub fn missing_book(transform: &str, book: &str) -> Self {
        Self::MissingBook {
            transform: transform.to_string(),
            book: book.to_string(),
        }
    }

    #[must_use]
    pub fn missing_location(transform: &str, location: impl ToString) -> Self {
        Self::MissingLocation {
            transform: transform.to_string(),
            location: location.to_string(),
        }
    }

    #[must_use]
    pub fn storage(transform: &str, error: BibleError) -> Self {
        Self::Storage {
            transform: transform.to_string(),
            error,
        }
    }
}
