//! Book and verse counts, and the comparison between two stat files.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bible::{Bible, Testament};

/// `book -> chapter -> verse count`
pub type ChapterCounts = BTreeMap<String, BTreeMap<i32, usize>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersesPerChapter {
    #[serde(default)]
    pub old: ChapterCounts,
    #[serde(default)]
    pub new: ChapterCounts,
}

/// Summary numbers for one Bible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibleStats {
    /// `[old, new]`
    pub num_books: [usize; 2],
    pub num_verses_per_chapter: VersesPerChapter,
    pub num_warnings: usize,
}

impl BibleStats {
    #[must_use]
    pub fn from_bible(bible: &Bible) -> Self {
        let mut stats = Self {
            num_warnings: bible.warnings().len(),
            ..Self::default()
        };
        for (slot, testament) in Testament::BOTH.into_iter().enumerate() {
            let counts = match testament {
                Testament::New => &mut stats.num_verses_per_chapter.new,
                _ => &mut stats.num_verses_per_chapter.old,
            };
            for name in bible.books(testament) {
                stats.num_books[slot] += 1;
                let chapters = counts.entry(name.to_string()).or_default();
                // Books registered without verses still count.
                let Some(book) = bible.book(name) else {
                    continue;
                };
                for (number, chapter) in book.chapters() {
                    chapters.insert(number, chapter.len());
                }
            }
        }
        stats
    }

    fn books(&self) -> BTreeMap<&str, Testament> {
        let mut books = BTreeMap::new();
        for book in self.num_verses_per_chapter.old.keys() {
            books.insert(book.as_str(), Testament::Old);
        }
        for book in self.num_verses_per_chapter.new.keys() {
            books.insert(book.as_str(), Testament::New);
        }
        books
    }

    fn chapters(&self, book: &str) -> Option<&BTreeMap<i32, usize>> {
        self.num_verses_per_chapter
            .new
            .get(book)
            .or_else(|| self.num_verses_per_chapter.old.get(book))
    }
}

/// Which of the two compared stat files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterMismatch {
    pub book: String,
    pub chapter: i32,
    pub first: usize,
    pub second: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingChapter {
    pub book: String,
    pub chapter: i32,
    pub missing_from: Side,
}

/// Differences between two [`BibleStats`], sorted by book then chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsDiff {
    pub first_name: String,
    pub second_name: String,
    pub only_in_first: Vec<(String, Testament)>,
    pub only_in_second: Vec<(String, Testament)>,
    pub shared_books: usize,
    pub mismatches: Vec<ChapterMismatch>,
    pub missing: Vec<MissingChapter>,
}

impl StatsDiff {
    /// Compares two stat files, labelled `stat1` and `stat2`.
    #[must_use]
    pub fn compare(first: &BibleStats, second: &BibleStats) -> Self {
        let first_books = first.books();
        let second_books = second.books();

        let only = |a: &BTreeMap<&str, Testament>, b: &BTreeMap<&str, Testament>| {
            a.iter()
                .filter(|(book, _)| !b.contains_key(*book))
                .map(|(book, testament)| ((*book).to_string(), *testament))
                .collect::<Vec<_>>()
        };

        let mut diff = Self {
            first_name: "stat1".to_string(),
            second_name: "stat2".to_string(),
            only_in_first: only(&first_books, &second_books),
            only_in_second: only(&second_books, &first_books),
            shared_books: 0,
            mismatches: Vec::new(),
            missing: Vec::new(),
        };

        let empty = BTreeMap::new();
        for book in first_books.keys().filter(|book| second_books.contains_key(*book)) {
            diff.shared_books += 1;
            let a = first.chapters(book).unwrap_or(&empty);
            let b = second.chapters(book).unwrap_or(&empty);
            let chapters: BTreeSet<i32> = a.keys().chain(b.keys()).copied().collect();
            for chapter in chapters {
                match (a.get(&chapter), b.get(&chapter)) {
                    (Some(&x), Some(&y)) if x != y => diff.mismatches.push(ChapterMismatch {
                        book: (*book).to_string(),
                        chapter,
                        first: x,
                        second: y,
                    }),
                    (Some(_), None) => diff.missing.push(MissingChapter {
                        book: (*book).to_string(),
                        chapter,
                        missing_from: Side::Second,
                    }),
                    (None, Some(_)) => diff.missing.push(MissingChapter {
                        book: (*book).to_string(),
                        chapter,
                        missing_from: Side::First,
                    }),
                    _ => {}
                }
            }
        }
        diff
    }

    #[must_use]
    pub fn with_names(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.second_name = second.into();
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.only_in_first.is_empty()
            && self.only_in_second.is_empty()
            && self.mismatches.is_empty()
            && self.missing.is_empty()
    }

    fn name(&self, side: Side) -> &str {
        match side {
            Side::First => &self.first_name,
            Side::Second => &self.second_name,
        }
    }
}

impl fmt::Display for StatsDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Books:")?;
        for (owner, other, books) in [
            (&self.first_name, &self.second_name, &self.only_in_first),
            (&self.second_name, &self.first_name, &self.only_in_second),
        ] {
            writeln!(f, "{owner} has {} books not in {other}:", books.len())?;
            for (book, testament) in books {
                writeln!(f, "\t- ({}) {book}", testament.abbreviation())?;
            }
        }
        writeln!(f)?;
        writeln!(f, "\nLooking at {} books in both Bibles\n", self.shared_books)?;

        // Interleave mismatches and missing chapters in book/chapter order.
        let mut lines: Vec<(&str, i32, String)> = Vec::new();
        for m in &self.mismatches {
            lines.push((
                m.book.as_str(),
                m.chapter,
                format!(
                    "{:>20} {:3}: {} has {:3} verse(s) but {} has {:3} verse(s)",
                    m.book, m.chapter, self.first_name, m.first, self.second_name, m.second
                ),
            ));
        }
        for m in &self.missing {
            lines.push((
                m.book.as_str(),
                m.chapter,
                format!(
                    "{}: chapter {} is missing from {}",
                    m.book,
                    m.chapter,
                    self.name(m.missing_from)
                ),
            ));
        }
        lines.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        for (_, _, line) in lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
