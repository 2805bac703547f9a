//! Provenance-tracked data-quality warnings.

use std::collections::HashSet;

use super::Location;

/// Well-known warning categories.
///
/// Categories are open strings: extractors and transforms may use others.
pub mod category {
    pub const UNKNOWN_CHAPTER_NUM: &str = "unknown chapter number";
    pub const MULTIPLE_CHAPTERS: &str = "multiple chapters";
    pub const UNKNOWN_VERSE_NUM: &str = "unknown verse number";
    pub const CANNOT_FIND_VERSE: &str = "cannot find verse";
    pub const CANNOT_FIND_VERSE_NUM: &str = "cannot find verse num";
    pub const EMPTY_VERSE: &str = "empty verse";
    pub const VERSE_RANGE: &str = "found bible range";
}

/// A note about a data-quality issue tied to one or more locations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Warning {
    locations: Vec<Location>,
    text: String,
    category: String,
}

impl Warning {
    #[must_use]
    pub fn new(
        locations: impl IntoLocations,
        text: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            locations: locations.into_locations(),
            text: text.into(),
            category: category.into(),
        }
    }

    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Copy of this warning with `"{source}: "` prepended to the text.
    #[must_use]
    pub fn attributed_to(&self, source: &str) -> Self {
        Self {
            text: format!("{source}: {}", self.text),
            ..self.clone()
        }
    }

    /// Copy with every location rewritten by `map`.
    #[must_use]
    pub fn map_locations(&self, map: impl FnMut(&Location) -> Location) -> Self {
        Self {
            locations: self.locations.iter().map(map).collect(),
            ..self.clone()
        }
    }
}

/// Accepts one location or many wherever a warning is recorded.
pub trait IntoLocations {
    fn into_locations(self) -> Vec<Location>;
}

impl IntoLocations for Location {
    fn into_locations(self) -> Vec<Location> {
        vec![self]
    }
}

impl IntoLocations for Vec<Location> {
    fn into_locations(self) -> Vec<Location> {
        self
    }
}

impl IntoLocations for &[Location] {
    fn into_locations(self) -> Vec<Location> {
        self.to_vec()
    }
}

impl<const N: usize> IntoLocations for [Location; N] {
    fn into_locations(self) -> Vec<Location> {
        self.into()
    }
}

/// Set of warnings that remembers insertion order.
#[derive(Debug, Clone, Default)]
pub struct WarningSet {
    ordered: Vec<Warning>,
    seen: HashSet<Warning>,
}

impl WarningSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `warning`; returns false if an identical one was already present.
    pub fn insert(&mut self, warning: Warning) -> bool {
        if self.seen.contains(&warning) {
            return false;
        }
        self.seen.insert(warning.clone());
        self.ordered.push(warning);
        true
    }

    #[must_use]
    pub fn contains(&self, warning: &Warning) -> bool {
        self.seen.contains(warning)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Warning> {
        self.ordered.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl PartialEq for WarningSet {
    fn eq(&self, other: &Self) -> bool {
        self.seen == other.seen
    }
}

impl<'a> IntoIterator for &'a WarningSet {
    type Item = &'a Warning;
    type IntoIter = std::slice::Iter<'a, Warning>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<Warning> for WarningSet {
    fn extend<I: IntoIterator<Item = Warning>>(&mut self, iter: I) {
        for warning in iter {
            self.insert(warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bible::Testament;

    fn sample() -> Warning {
        Warning::new(
            Location::new("Genesis", 1, 1),
            "Found bible range",
            category::VERSE_RANGE,
        )
    }

    #[test]
    fn test_single_location_is_wrapped() {
        assert_eq!(sample().locations().len(), 1);
        assert_eq!(sample().locations()[0], Location::new("Genesis", 1, 1));
    }

    #[test]
    fn test_duplicate_warning_collapses() {
        let mut set = WarningSet::new();
        assert!(set.insert(sample()));
        assert!(!set.insert(sample()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_warning_identity_ignores_book_case() {
        let mut set = WarningSet::new();
        set.insert(sample());
        let shouted = Warning::new(
            Location::new("GENESIS", 1, 1),
            "Found bible range",
            category::VERSE_RANGE,
        );
        assert!(set.contains(&shouted));
    }

    #[test]
    fn test_different_category_is_distinct() {
        let mut set = WarningSet::new();
        set.insert(sample());
        set.insert(Warning::new(
            Location::new("Genesis", 1, 1),
            "Found bible range",
            "other",
        ));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_attributed_to_prefixes_source() {
        let warning = sample().attributed_to("Douay-Rheims Bible");
        assert_eq!(warning.text(), "Douay-Rheims Bible: Found bible range");
        assert_eq!(warning.category(), category::VERSE_RANGE);
    }

    #[test]
    fn test_map_locations_rewrites_each() {
        let warning = Warning::new(
            [
                Location::new("3 Kings", 1, 1),
                Location::new("3 Kings", 1, 2),
            ],
            "range",
            "",
        );
        let mapped = warning.map_locations(|loc| loc.retagged(Testament::Old).with_book("Kings III"));
        assert!(
            mapped
                .locations()
                .iter()
                .all(|loc| loc.book() == "Kings III" && loc.testament() == Testament::Old)
        );
    }
}
