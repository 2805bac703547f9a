//! Verse values and read-only book/chapter views.

use super::Location;
use super::ordered::OrderedMap;

/// A single verse: where it lives and what it says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    location: Location,
    text: String,
}

impl Verse {
    #[must_use]
    pub fn new(location: Location, text: impl Into<String>) -> Self {
        Self {
            location,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_parts(self) -> (Location, String) {
        (self.location, self.text)
    }
}

/// Verses of one chapter, keyed by verse number in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chapter {
    pub(crate) verses: OrderedMap<i32, String>,
}

impl Chapter {
    /// `(verse number, text)` pairs in the order they were written.
    pub fn verses(&self) -> impl Iterator<Item = (i32, &str)> {
        self.verses.iter().map(|(num, text)| (*num, text.as_str()))
    }

    #[must_use]
    pub fn get(&self, verse: i32) -> Option<&str> {
        self.verses.get(&verse).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.verses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Highest verse number stored, if any.
    #[must_use]
    pub fn max_verse(&self) -> Option<i32> {
        self.verses.keys().copied().max()
    }
}

/// A book's chapters in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub(crate) name: String,
    pub(crate) chapters: OrderedMap<i32, Chapter>,
}

impl Book {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chapters: OrderedMap::new(),
        }
    }

    /// Name as first written.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chapters(&self) -> impl Iterator<Item = (i32, &Chapter)> {
        self.chapters.iter().map(|(num, chapter)| (*num, chapter))
    }

    #[must_use]
    pub fn chapter(&self, number: i32) -> Option<&Chapter> {
        self.chapters.get(&number)
    }

    #[must_use]
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    #[must_use]
    pub fn verse_count(&self) -> usize {
        self.chapters.values().map(Chapter::len).sum()
    }
}
