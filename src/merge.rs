//! Priority-ordered merging of independently scraped Bibles.
//!
//! [`merge`] folds its inputs left to right. The first Bible has the highest
//! priority: later ones only fill locations the result does not have yet.
//! Warnings from a later source are carried over only when they concern a
//! location that source actually contributed, and their text is prefixed
//! with the source name.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info};

use crate::bible::{Bible, BibleError, VerseAddress};

/// Errors that can occur while merging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// No Bible was given.
    #[error("merge needs at least one bible\n  Suggestion: Pass one or more sources")]
    EmptyInput,

    /// A book was classified under different testaments by two sources.
    #[error("cannot merge '{source_name}': {error}")]
    Conflict {
        /// Name of the Bible being merged in
        source_name: String,
        /// Underlying membership conflict
        error: BibleError,
    },
}

impl MergeError {
    fn conflict(source_name: &str, error: BibleError) -> Self {
        Self::Conflict {
            source_name: source_name.to_string(),
            error,
        }
    }
}

/// Merges `bibles` in descending priority order.
///
/// Book names are canonicalized in every input first, so `"3 Kings"` and
/// `"Kings III"` meet. Inputs are only read; the result owns fresh storage.
///
/// # Errors
///
/// [`MergeError::EmptyInput`] for an empty slice, [`MergeError::Conflict`]
/// when a gap-filling verse belongs to a book the result files under the
/// other testament.
#[tracing::instrument(skip(bibles), fields(count = bibles.len()))]
pub fn merge(bibles: &[Bible]) -> Result<Bible, MergeError> {
    let Some((first, rest)) = bibles.split_first() else {
        return Err(MergeError::EmptyInput);
    };

    let mut result = first
        .canonicalize_book_names()
        .map_err(|error| MergeError::conflict(first.name(), error))?;
    for bible in rest {
        let secondary = bible
            .canonicalize_book_names()
            .map_err(|error| MergeError::conflict(bible.name(), error))?;
        result = merge_two(result, &secondary)?;
    }
    Ok(result)
}

fn merge_two(mut primary: Bible, secondary: &Bible) -> Result<Bible, MergeError> {
    let merged_name = format!("{} and {}", primary.name(), secondary.name());
    primary.set_name(merged_name);

    let mut added: HashSet<VerseAddress> = HashSet::new();
    for verse in secondary.iter(None) {
        if primary.contains(verse.location()) {
            continue;
        }
        debug!(
            location = %verse.location(),
            source = secondary.name(),
            "Filling gap from lower-priority source"
        );
        primary
            .set(verse.location(), verse.text())
            .map_err(|error| MergeError::conflict(secondary.name(), error))?;
        added.insert(verse.location().address());
    }

    let mut carried = 0usize;
    for warning in secondary.warnings() {
        let concerns_added = warning
            .locations()
            .iter()
            .any(|location| added.contains(&location.address()));
        if concerns_added && primary.add_warning(warning.attributed_to(secondary.name())) {
            carried += 1;
        }
    }

    info!(
        source = secondary.name(),
        verses_added = added.len(),
        warnings_carried = carried,
        "Merged source"
    );
    Ok(primary)
}
