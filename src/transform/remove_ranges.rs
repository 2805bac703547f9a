//! Dropping verses that an extractor merged from a verse range.

use std::collections::HashSet;

use tracing::info;

use crate::bible::{Bible, Testament, VerseAddress, category};

use super::TransformError;

/// Removes every verse named by a `"found bible range"` warning.
///
/// Locations are compared without their testament tag. Warnings are kept.
///
/// # Errors
///
/// Never fails on a consistent Bible.
pub fn remove_ranges(bible: &Bible) -> Result<Bible, TransformError> {
    let mut blacklist: HashSet<VerseAddress> = HashSet::new();
    for warning in bible
        .warnings()
        .iter()
        .filter(|w| w.category() == category::VERSE_RANGE)
    {
        for location in warning.locations() {
            info!(location = %location, "Skipping location");
            blacklist.insert(location.address());
        }
    }

    let mut out = Bible::new(bible.name());
    for testament in Testament::BOTH {
        for book in bible.books(testament) {
            out.add_book(book, testament)
                .map_err(|error| TransformError::storage("remove_ranges", error))?;
        }
    }
    for verse in bible
        .iter(None)
        .filter(|v| !blacklist.contains(&v.location().address()))
    {
        out.append(verse)
            .map_err(|error| TransformError::storage("remove_ranges", error))?;
    }
    for warning in bible.warnings() {
        out.add_warning(warning.clone());
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bible::Location;

    #[test]
    fn test_remove_ranges_drops_range_verses_only() {
        let mut bible = Bible::new("lxx");
        for verse in 1..=4 {
            bible
                .set(
                    &Location::with_testament("Psalms", 9, verse, Testament::Old),
                    format!("verse {verse}"),
                )
                .unwrap();
        }
        bible.warn(
            vec![Location::new("psalms", 9, 2), Location::new("psalms", 9, 3)],
            "Found bible range. Merging into the first verse.",
            category::VERSE_RANGE,
        );
        bible.warn(Location::new("Psalms", 9, 4), "other", category::EMPTY_VERSE);

        let out = remove_ranges(&bible).unwrap();
        let kept: Vec<i32> = out.iter(None).map(|v| v.location().verse()).collect();
        assert_eq!(kept, vec![1, 4]);
        assert_eq!(out.warnings().len(), 2);
    }

    #[test]
    fn test_remove_ranges_without_warnings_is_identity() {
        let mut bible = Bible::new("plain");
        bible
            .set(&Location::with_testament("Ruth", 1, 1, Testament::Old), "a")
            .unwrap();
        assert_eq!(remove_ranges(&bible).unwrap(), bible);
    }
}
