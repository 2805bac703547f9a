//! Persisted JSON layout.
//!
//! ```json
//! {
//!   "name": "...",
//!   "testaments": { "old": { "<book>": { "<chapter>": { "<verse>": "<text>" } } }, "new": {} },
//!   "order": { "old": ["<book>"], "new": [] },
//!   "warnings": [ { "locs": [["<book>", 1, 2, 0]], "text": "...", "type": "..." } ]
//! }
//! ```
//!
//! Maps are written in insertion order and read back in document order, so
//! a round-trip preserves book, chapter and verse order exactly.

use std::fmt;
use std::io::{Read, Write};
use std::marker::PhantomData;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::bible::{Bible, Book, Chapter, Location, Testament, Warning};

use super::ExportError;

/// Serializes `bible` to a compact JSON string.
///
/// # Errors
///
/// [`ExportError::Json`] if serialization fails.
pub fn to_json_string(bible: &Bible) -> Result<String, ExportError> {
    Ok(serde_json::to_string(&PersistedBible(bible))?)
}

/// Serializes `bible` into `writer`.
///
/// # Errors
///
/// [`ExportError::Json`] on serialization or write failure.
pub fn to_json_writer<W: Write>(bible: &Bible, writer: W) -> Result<(), ExportError> {
    serde_json::to_writer(writer, &PersistedBible(bible))?;
    Ok(())
}

/// Parses a persisted Bible.
///
/// # Errors
///
/// [`ExportError::Json`] for malformed documents,
/// [`ExportError::InvalidNumber`] for non-integer chapter/verse keys,
/// [`ExportError::Storage`] if the document files a book under both testaments.
pub fn from_json_str(raw: &str) -> Result<Bible, ExportError> {
    let document: Document = serde_json::from_str(raw)?;
    document.into_bible()
}

/// Parses a persisted Bible from a reader.
///
/// # Errors
///
/// Same as [`from_json_str`].
pub fn from_json_reader<R: Read>(reader: R) -> Result<Bible, ExportError> {
    let document: Document = serde_json::from_reader(reader)?;
    document.into_bible()
}

// ==================== Writing ====================

struct PersistedBible<'a>(&'a Bible);

impl Serialize for PersistedBible<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let bible = self.0;
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("name", bible.name())?;
        map.serialize_entry("testaments", &TestamentsView(bible))?;
        map.serialize_entry(
            "order",
            &OrderView {
                old: bible.books(Testament::Old).collect(),
                new: bible.books(Testament::New).collect(),
            },
        )?;
        let warnings: Vec<WarningView<'_>> = bible.warnings().iter().map(WarningView::from).collect();
        map.serialize_entry("warnings", &warnings)?;
        map.end()
    }
}

struct TestamentsView<'a>(&'a Bible);

impl Serialize for TestamentsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        for testament in Testament::BOTH {
            map.serialize_entry(testament.as_str(), &BooksView(self.0, testament))?;
        }
        map.end()
    }
}

struct BooksView<'a>(&'a Bible, Testament);

impl Serialize for BooksView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let books: Vec<&Book> = self
            .0
            .books(self.1)
            .filter_map(|name| self.0.book(name))
            .collect();
        let mut map = serializer.serialize_map(Some(books.len()))?;
        for book in books {
            map.serialize_entry(book.name(), &ChaptersView(book))?;
        }
        map.end()
    }
}

struct ChaptersView<'a>(&'a Book);

impl Serialize for ChaptersView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.chapter_count()))?;
        for (number, chapter) in self.0.chapters() {
            map.serialize_entry(&number.to_string(), &VersesView(chapter))?;
        }
        map.end()
    }
}

struct VersesView<'a>(&'a Chapter);

impl Serialize for VersesView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (number, text) in self.0.verses() {
            map.serialize_entry(&number.to_string(), text)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct OrderView<'a> {
    old: Vec<&'a str>,
    new: Vec<&'a str>,
}

#[derive(Serialize)]
struct WarningView<'a> {
    locs: Vec<(&'a str, i32, i32, i8)>,
    text: &'a str,
    #[serde(rename = "type")]
    category: &'a str,
}

impl<'a> From<&'a Warning> for WarningView<'a> {
    fn from(warning: &'a Warning) -> Self {
        Self {
            locs: warning
                .locations()
                .iter()
                .map(|loc| (loc.book(), loc.chapter(), loc.verse(), loc.testament().as_i8()))
                .collect(),
            text: warning.text(),
            category: warning.category(),
        }
    }
}

// ==================== Reading ====================

#[derive(Deserialize)]
struct Document {
    name: String,
    testaments: TestamentsDocument,
    order: OrderDocument,
    #[serde(default)]
    warnings: Vec<WarningDocument>,
}

#[derive(Deserialize)]
struct TestamentsDocument {
    #[serde(default)]
    old: InOrder<InOrder<InOrder<String>>>,
    #[serde(default)]
    new: InOrder<InOrder<InOrder<String>>>,
}

#[derive(Deserialize)]
struct OrderDocument {
    #[serde(default)]
    old: Vec<String>,
    #[serde(default)]
    new: Vec<String>,
}

#[derive(Deserialize)]
struct WarningDocument {
    locs: Vec<(String, i32, i32, i8)>,
    text: String,
    #[serde(rename = "type", default)]
    category: String,
}

impl Document {
    fn into_bible(self) -> Result<Bible, ExportError> {
        let mut bible = Bible::new(self.name);

        for book in &self.order.old {
            bible.add_book(book, Testament::Old)?;
        }
        for book in &self.order.new {
            bible.add_book(book, Testament::New)?;
        }

        for (testament, books) in [
            (Testament::Old, self.testaments.old),
            (Testament::New, self.testaments.new),
        ] {
            for (book, chapters) in books.0 {
                for (chapter_key, verses) in chapters.0 {
                    let chapter = parse_number("chapter", &chapter_key, &book)?;
                    for (verse_key, text) in verses.0 {
                        let verse = parse_number("verse", &verse_key, &book)?;
                        bible.set(
                            &Location::with_testament(book.as_str(), chapter, verse, testament),
                            text,
                        )?;
                    }
                }
            }
        }

        for warning in self.warnings {
            let locations: Vec<Location> = warning
                .locs
                .into_iter()
                .map(|(book, chapter, verse, testament)| {
                    Location::with_testament(book, chapter, verse, Testament::from_i8(testament))
                })
                .collect();
            bible.add_warning(Warning::new(locations, warning.text, warning.category));
        }

        Ok(bible)
    }
}

fn parse_number(what: &'static str, key: &str, book: &str) -> Result<i32, ExportError> {
    key.trim()
        .parse::<i32>()
        .map_err(|_| ExportError::invalid_number(what, key, book))
}

/// JSON object read as `(key, value)` pairs in document order.
struct InOrder<V>(Vec<(String, V)>);

impl<V> Default for InOrder<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for InOrder<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct InOrderVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for InOrderVisitor<V> {
            type Value = InOrder<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(InOrder(entries))
            }
        }

        deserializer.deserialize_map(InOrderVisitor(PhantomData))
    }
}
