//! Flags suspiciously short verses.

use tracing::warn;

use crate::bible::Bible;

use super::TransformError;

/// Verses with fewer characters than this are reported.
pub const MIN_VERSE_LEN: usize = 10;

/// Logs every verse shorter than [`MIN_VERSE_LEN`] characters.
///
/// Reporting only: the returned Bible equals the input.
///
/// # Errors
///
/// Never fails.
pub fn check_lengths(bible: &Bible) -> Result<Bible, TransformError> {
    let mut short = 0usize;
    for verse in bible.iter(None) {
        if verse.text().chars().count() < MIN_VERSE_LEN {
            short += 1;
            warn!(location = %verse.location(), "Verse is small");
        }
    }
    if short > 0 {
        warn!(count = short, bible = bible.name(), "Short verses found");
    }
    Ok(bible.clone())
}
