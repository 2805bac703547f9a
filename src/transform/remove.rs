//! Dropping a whole testament.

use crate::bible::{Bible, Testament};

use super::TransformError;

/// Removes the Old Testament.
///
/// # Errors
///
/// Never fails on a consistent Bible.
pub fn remove_old(bible: &Bible) -> Result<Bible, TransformError> {
    keep_only(bible, Testament::New, "remove_old")
}

/// Removes the New Testament.
///
/// # Errors
///
/// Never fails on a consistent Bible.
pub fn remove_new(bible: &Bible) -> Result<Bible, TransformError> {
    keep_only(bible, Testament::Old, "remove_new")
}

fn keep_only(bible: &Bible, kept: Testament, name: &str) -> Result<Bible, TransformError> {
    let mut out = Bible::new(bible.name());
    for book in bible.books(kept) {
        out.add_book(book, kept)
            .map_err(|error| TransformError::storage(name, error))?;
    }
    for verse in bible.iter(Some(kept)) {
        out.append(verse)
            .map_err(|error| TransformError::storage(name, error))?;
    }
    for warning in bible.warnings() {
        out.add_warning(warning.clone());
    }
    Ok(out)
}
