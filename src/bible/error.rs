//! Error types for Bible storage operations.

use thiserror::Error;

use super::{Location, Testament};

/// Errors raised by [`Bible`](super::Bible) mutation and lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BibleError {
    /// A book was claimed by the testament opposite to the one it is filed under.
    #[error(
        "book '{book}' is already in the {existing} testament, cannot add it to the {requested} testament\n  Suggestion: Check the extractor's testament classification for this book"
    )]
    InconsistentTestament {
        /// The book name as written by the caller
        book: String,
        /// Testament the book currently belongs to
        existing: Testament,
        /// Testament the caller tried to file it under
        requested: Testament,
    },

    /// No verse is stored at the requested location.
    #[error("no verse found at {location}")]
    NotFound {
        /// The location that did not resolve
        location: Location,
    },

    /// A verse was written for a book with no testament membership.
    #[error(
        "book '{book}' has no testament yet and the location does not name one\n  Suggestion: Register the book with add_book or tag the location with a testament"
    )]
    UnassignedTestament {
        /// The book name as written by the caller
        book: String,
    },
}

impl BibleError {
    /// Creates an `InconsistentTestament` error.
    #[must_use]
    pub fn inconsistent(book: &str, existing: Testament, requested: Testament) -> Self {
        Self::InconsistentTestament {
            book: book.to_string(),
            existing,
            requested,
        }
    }

    /// Creates a `NotFound` error.
    #[must_use]
    pub fn not_found(location: &Location) -> Self {
        Self::NotFound {
            location: location.clone(),
        }
    }

    /// Creates an `UnassignedTestament` error.
    #[must_use]
    pub fn unassigned(book: &str) -> Self {
        Self::UnassignedTestament {
            book: book.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_inconsistent_testament_message() {
        let err = BibleError::inconsistent("Genesis", Testament::Old, Testament::New);
        let msg = err.to_string();
        assert!(msg.contains("Genesis"), "should contain book");
        assert!(msg.contains("old"), "should name existing testament");
        assert!(msg.contains("new"), "should name requested testament");
        assert!(msg.contains("Suggestion"), "should have suggestion");
    }

    #[test]
    fn test_not_found_message_renders_location() {
        let err = BibleError::not_found(&Location::new("Exodus", 3, 14));
        assert_eq!(err.to_string(), "no verse found at Exodus 3:14");
    }

    #[test]
    fn test_unassigned_message() {
        let err = BibleError::unassigned("Tobit");
        assert!(err.to_string().contains("Tobit"));
        assert!(err.to_string().contains("add_book"));
    }
}
