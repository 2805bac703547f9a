//! Canonical in-memory Bible representation.
//!
//! A [`Bible`] stores verse text as book → chapter → verse, keeps the
//! insertion order of books (per testament), chapters and verses, and
//! carries a set of [`Warning`]s describing data-quality issues found while
//! scraping.
//!
//! # Example
//!
//! ```
//! use bible_extractor_core::bible::{Bible, Location, Testament};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut bible = Bible::new("Example");
//! let loc = Location::with_testament("Genesis", 1, 1, Testament::Old);
//! bible.set(&loc, "In the beginning God created heaven, and earth.")?;
//!
//! assert!(bible.contains(&Location::new("genesis", 1, 1)));
//! assert_eq!(bible.get(&loc)?.text(), "In the beginning God created heaven, and earth.");
//! # Ok(())
//! # }
//! ```

mod error;
mod location;
mod names;
mod ordered;
mod verse;
mod warning;

pub use error::BibleError;
pub use location::{BookKey, Location, Testament, UNKNOWN_NUMBER, VerseAddress, fold_book_name};
pub use names::{canonicalize_book_name, from_roman, to_roman};
pub use ordered::OrderedMap;
pub use verse::{Book, Chapter, Verse};
pub use warning::{IntoLocations, Warning, WarningSet, category};

use std::collections::HashMap;

use tracing::{debug, warn};

const OLD_ONLY: [Testament; 1] = [Testament::Old];
const NEW_ONLY: [Testament; 1] = [Testament::New];

/// The aggregate document produced by an extractor.
///
/// Every stored book belongs to exactly one testament. Verses are kept as
/// written: nothing fills gaps or reorders numbers, see [`Bible::check`] for
/// auditing. The type is not internally synchronized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bible {
    name: String,
    order: [Vec<BookKey>; 2],
    membership: HashMap<String, Testament>,
    books: OrderedMap<String, Book>,
    warnings: WarningSet,
}

impl Bible {
    /// Creates an empty, named Bible.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Descriptive label; informational only.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Files `book` under `testament`, appending it to that testament's order.
    ///
    /// Registering a book again under the same testament is a no-op.
    ///
    /// # Errors
    ///
    /// [`BibleError::InconsistentTestament`] if the book is already in the
    /// other testament, [`BibleError::UnassignedTestament`] if `testament` is
    /// `Unknown`.
    pub fn add_book(&mut self, book: &str, testament: Testament) -> Result<(), BibleError> {
        let Some(slot) = order_slot(testament) else {
            return Err(BibleError::unassigned(book));
        };
        let key = fold_book_name(book);
        match self.membership.get(&key) {
            Some(&existing) if existing == testament => Ok(()),
            Some(&existing) => Err(BibleError::inconsistent(book, existing, testament)),
            None => {
                debug!(book, %testament, "Registering book");
                self.membership.insert(key, testament);
                self.order[slot].push(BookKey::new(book));
                Ok(())
            }
        }
    }

    /// Testament a book is filed under, if it is known.
    #[must_use]
    pub fn testament_of(&self, book: &str) -> Option<Testament> {
        self.membership.get(&fold_book_name(book)).copied()
    }

    /// Book names of one testament in insertion order.
    pub fn books(&self, testament: Testament) -> impl Iterator<Item = &str> {
        order_slot(testament)
            .map(|slot| self.order[slot].as_slice())
            .unwrap_or_default()
            .iter()
            .map(BookKey::name)
    }

    /// Read-only view of a book's chapters.
    #[must_use]
    pub fn book(&self, name: &str) -> Option<&Book> {
        self.books.get(&fold_book_name(name))
    }

    /// Stores `text` at `location`, creating the book and chapter as needed.
    ///
    /// A known testament on the location establishes (or must agree with)
    /// the book's membership. An `Unknown` testament requires the book to be
    /// registered already.
    ///
    /// # Errors
    ///
    /// [`BibleError::InconsistentTestament`] when the location's testament
    /// contradicts the book's membership, [`BibleError::UnassignedTestament`]
    /// when no membership can be established.
    pub fn set(&mut self, location: &Location, text: impl Into<String>) -> Result<(), BibleError> {
        let book = location.book();
        if location.testament().is_known() {
            self.add_book(book, location.testament())?;
        } else if self.testament_of(book).is_none() {
            return Err(BibleError::unassigned(book));
        }

        let key = location.book_key();
        let display = self.display_name(&key).unwrap_or(book).to_string();
        self.books
            .get_or_insert_with(key, || Book::new(display))
            .chapters
            .get_or_insert_with(location.chapter(), Chapter::default)
            .verses
            .insert(location.verse(), text.into());
        Ok(())
    }

    /// Sugar for `set(verse.location(), verse.text())`.
    ///
    /// # Errors
    ///
    /// Same as [`Bible::set`].
    pub fn append(&mut self, verse: Verse) -> Result<(), BibleError> {
        let (location, text) = verse.into_parts();
        self.set(&location, text)
    }

    /// Returns the verse at `location`.
    ///
    /// The returned location carries the stored book name and testament.
    ///
    /// # Errors
    ///
    /// [`BibleError::NotFound`] if the book, chapter or verse is missing.
    pub fn get(&self, location: &Location) -> Result<Verse, BibleError> {
        let text = self
            .text(location)
            .ok_or_else(|| BibleError::not_found(location))?;
        let key = location.book_key();
        let testament = self
            .membership
            .get(&key)
            .copied()
            .unwrap_or(Testament::Unknown);
        let book = self.display_name(&key).unwrap_or(location.book());
        Ok(Verse::new(
            Location::with_testament(book, location.chapter(), location.verse(), testament),
            text,
        ))
    }

    /// Verse text at `location`, ignoring its testament tag.
    #[must_use]
    pub fn text(&self, location: &Location) -> Option<&str> {
        self.books
            .get(&location.book_key())?
            .chapter(location.chapter())?
            .get(location.verse())
    }

    #[must_use]
    pub fn contains(&self, location: &Location) -> bool {
        self.text(location).is_some()
    }

    /// Walks verses in canonical order.
    ///
    /// With no filter: Old Testament first, then New; within each, book,
    /// chapter and verse insertion order. Every call starts a fresh walk.
    pub fn iter(&self, testament: Option<Testament>) -> impl Iterator<Item = Verse> + '_ {
        let testaments: &'static [Testament] = match testament {
            None => &Testament::BOTH,
            Some(Testament::Old) => &OLD_ONLY,
            Some(Testament::New) => &NEW_ONLY,
            Some(Testament::Unknown) => &[],
        };
        testaments.iter().flat_map(move |&testament| {
            self.books(testament)
                .filter_map(move |name| self.book(name))
                .flat_map(move |book| {
                    book.chapters().flat_map(move |(chapter_num, chapter)| {
                        chapter.verses().map(move |(verse_num, text)| {
                            Verse::new(
                                Location::with_testament(
                                    book.name(),
                                    chapter_num,
                                    verse_num,
                                    testament,
                                ),
                                text,
                            )
                        })
                    })
                })
        })
    }

    /// Number of stored verses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.values().map(Book::verse_count).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes a book, its verses and its testament membership.
    ///
    /// Warnings that mention the book are kept.
    pub fn remove_book(&mut self, name: &str) -> bool {
        let key = fold_book_name(name);
        let Some(testament) = self.membership.remove(&key) else {
            return false;
        };
        if let Some(slot) = order_slot(testament) {
            self.order[slot].retain(|book| book.key() != key);
        }
        self.books.remove(&key);
        true
    }

    /// Replaces all chapters of a registered book, keeping its position.
    ///
    /// # Errors
    ///
    /// [`BibleError::NotFound`] if the book has no testament membership.
    pub fn replace_chapters<I, V>(&mut self, name: &str, chapters: I) -> Result<(), BibleError>
    where
        I: IntoIterator<Item = (i32, V)>,
        V: IntoIterator<Item = (i32, String)>,
    {
        let key = fold_book_name(name);
        let Some(testament) = self.testament_of(name) else {
            return Err(BibleError::not_found(&Location::book_level(
                name,
                Testament::Unknown,
            )));
        };
        let display = self.display_name(&key).unwrap_or(name).to_string();
        let mut book = Book::new(display);
        for (chapter_num, verses) in chapters {
            let chapter = book
                .chapters
                .get_or_insert_with(chapter_num, Chapter::default);
            for (verse_num, text) in verses {
                chapter.verses.insert(verse_num, text);
            }
        }
        debug!(book = name, %testament, chapters = book.chapter_count(), "Replacing chapters");
        self.books.insert(key, book);
        Ok(())
    }

    /// Records a warning about one or more locations.
    ///
    /// Identical warnings collapse into one. Never fails.
    pub fn warn(
        &mut self,
        locations: impl IntoLocations,
        text: impl Into<String>,
        category: impl Into<String>,
    ) {
        let warning = Warning::new(locations, text, category);
        match warning.locations().first() {
            Some(first) => warn!(
                location = %first,
                category = warning.category(),
                "{}",
                warning.text()
            ),
            None => warn!(category = warning.category(), "{}", warning.text()),
        }
        self.warnings.insert(warning);
    }

    /// Inserts an already-built warning without logging it.
    pub fn add_warning(&mut self, warning: Warning) -> bool {
        self.warnings.insert(warning)
    }

    #[must_use]
    pub fn warnings(&self) -> &WarningSet {
        &self.warnings
    }

    /// Audits verse numbering.
    ///
    /// For each chapter, verses `1..=max` are expected in stored order; the
    /// first position that disagrees yields one diagnostic for that chapter.
    /// Never fails; callers decide what to do with the report.
    #[must_use]
    pub fn check(&self) -> Vec<String> {
        let mut diagnostics = Vec::new();
        for testament in Testament::BOTH {
            for book in self.books(testament).filter_map(|name| self.book(name)) {
                for (chapter_num, chapter) in book.chapters() {
                    let Some(max_verse) = chapter.max_verse() else {
                        continue;
                    };
                    let stored: Vec<i32> = chapter.verses().map(|(num, _)| num).collect();
                    let consistent = (1..=max_verse)
                        .zip(0usize..)
                        .all(|(expected, position)| stored.get(position) == Some(&expected));
                    if !consistent {
                        diagnostics.push(format!(
                            "Inconsistent verse number in chapter {chapter_num} in book {}",
                            book.name()
                        ));
                    }
                }
            }
        }
        diagnostics
    }

    /// Copy with every book name passed through [`canonicalize_book_name`].
    ///
    /// Books whose names collapse to the same canonical form are combined;
    /// the verse written first wins. Warning locations are renamed too.
    ///
    /// # Errors
    ///
    /// [`BibleError::InconsistentTestament`] if two names that collapse
    /// together sit in different testaments.
    pub fn canonicalize_book_names(&self) -> Result<Self, BibleError> {
        let mut renamed = Self::new(self.name.clone());
        for testament in Testament::BOTH {
            for name in self.books(testament) {
                renamed.add_book(&canonicalize_book_name(name), testament)?;
            }
        }
        for verse in self.iter(None) {
            let location = verse
                .location()
                .with_book(canonicalize_book_name(verse.location().book()));
            if !renamed.contains(&location) {
                renamed.set(&location, verse.text())?;
            }
        }
        for warning in &self.warnings {
            renamed.add_warning(
                warning.map_locations(|loc| loc.with_book(canonicalize_book_name(loc.book()))),
            );
        }
        Ok(renamed)
    }

    fn display_name(&self, key: &str) -> Option<&str> {
        let slot = order_slot(*self.membership.get(key)?)?;
        self.order[slot]
            .iter()
            .find(|book| book.key() == key)
            .map(BookKey::name)
    }
}

impl<'a> IntoIterator for &'a Bible {
    type Item = Verse;
    type IntoIter = Box<dyn Iterator<Item = Verse> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter(None))
    }
}

fn order_slot(testament: Testament) -> Option<usize> {
    match testament {
        Testament::Old => Some(0),
        Testament::New => Some(1),
        Testament::Unknown => None,
    }
}
