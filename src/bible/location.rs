//! Verse addressing: testaments, case-insensitive book keys and locations.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Chapter or verse number meaning "unknown / not applicable".
pub const UNKNOWN_NUMBER: i32 = -1;

/// Division of the canonical book ordering.
///
/// `Unknown` is accepted on input (an extractor may not know where a book
/// belongs yet) but a book stored in a [`Bible`](super::Bible) is always
/// `Old` or `New`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Testament {
    Old,
    New,
    Unknown,
}

impl Testament {
    /// Both concrete testaments, in canonical order.
    pub const BOTH: [Testament; 2] = [Testament::Old, Testament::New];

    /// Integer tag used by the persisted JSON layout (`0`, `1`, `-1`).
    #[must_use]
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Old => 0,
            Self::New => 1,
            Self::Unknown => -1,
        }
    }

    /// Inverse of [`Testament::as_i8`]; any other value maps to `Unknown`.
    #[must_use]
    pub fn from_i8(value: i8) -> Self {
        match value {
            0 => Self::Old,
            1 => Self::New,
            _ => Self::Unknown,
        }
    }

    /// Stable lowercase label (`"old"`, `"new"`, `"unknown"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
            Self::Unknown => "unknown",
        }
    }

    /// Short tag used in reports (`OT` / `NT`).
    #[must_use]
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Old => "OT",
            Self::New => "NT",
            Self::Unknown => "??",
        }
    }

    #[must_use]
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl fmt::Display for Testament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical map key for a book name.
///
/// Holds the lowercased key used for comparison and hashing next to the name
/// as first written, which is what gets displayed and persisted.
#[derive(Debug, Clone)]
pub struct BookKey {
    key: String,
    name: String,
}

impl BookKey {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: fold_book_name(&name),
            name,
        }
    }

    /// The lowercased comparison key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The name as originally written.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for BookKey {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for BookKey {}

impl Hash for BookKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for BookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Lowercases a book name for case-insensitive comparison.
#[must_use]
pub fn fold_book_name(name: &str) -> String {
    name.to_lowercase()
}

/// Address of a verse (or coarser unit) inside a Bible.
///
/// Book comparison and hashing ignore case, so `"Genesis"` and `"genesis"`
/// name the same location. Chapter or verse [`UNKNOWN_NUMBER`] marks a
/// book- or chapter-level location.
#[derive(Debug, Clone)]
pub struct Location {
    book: String,
    chapter: i32,
    verse: i32,
    testament: Testament,
}

impl Location {
    /// Creates a location with an unknown testament.
    #[must_use]
    pub fn new(book: impl Into<String>, chapter: i32, verse: i32) -> Self {
        Self::with_testament(book, chapter, verse, Testament::Unknown)
    }

    #[must_use]
    pub fn with_testament(
        book: impl Into<String>,
        chapter: i32,
        verse: i32,
        testament: Testament,
    ) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
            testament,
        }
    }

    /// Book-level location (chapter and verse unknown).
    #[must_use]
    pub fn book_level(book: impl Into<String>, testament: Testament) -> Self {
        Self::with_testament(book, UNKNOWN_NUMBER, UNKNOWN_NUMBER, testament)
    }

    /// Chapter-level location (verse unknown).
    #[must_use]
    pub fn chapter_level(book: impl Into<String>, chapter: i32, testament: Testament) -> Self {
        Self::with_testament(book, chapter, UNKNOWN_NUMBER, testament)
    }

    #[must_use]
    pub fn book(&self) -> &str {
        &self.book
    }

    #[must_use]
    pub fn chapter(&self) -> i32 {
        self.chapter
    }

    #[must_use]
    pub fn verse(&self) -> i32 {
        self.verse
    }

    #[must_use]
    pub fn testament(&self) -> Testament {
        self.testament
    }

    /// Lowercased book key.
    #[must_use]
    pub fn book_key(&self) -> String {
        fold_book_name(&self.book)
    }

    /// Same location with another book name.
    #[must_use]
    pub fn with_book(&self, book: impl Into<String>) -> Self {
        Self {
            book: book.into(),
            ..self.clone()
        }
    }

    /// Same location tagged with another testament.
    #[must_use]
    pub fn retagged(&self, testament: Testament) -> Self {
        Self {
            testament,
            ..self.clone()
        }
    }

    /// Testament-free address, for comparing locations across sources.
    #[must_use]
    pub fn address(&self) -> VerseAddress {
        VerseAddress {
            book: self.book_key(),
            chapter: self.chapter,
            verse: self.verse,
        }
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.chapter == other.chapter
            && self.verse == other.verse
            && self.testament == other.testament
            && fold_book_name(&self.book) == fold_book_name(&other.book)
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        fold_book_name(&self.book).hash(state);
        self.chapter.hash(state);
        self.verse.hash(state);
        self.testament.hash(state);
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.chapter <= 0 {
            write!(f, "{}", self.book)
        } else if self.verse <= 0 {
            write!(f, "{} {}", self.book, self.chapter)
        } else {
            write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
        }
    }
}

/// Case-folded `(book, chapter, verse)` triple without testament.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerseAddress {
    pub book: String,
    pub chapter: i32,
    pub verse: i32,
}
