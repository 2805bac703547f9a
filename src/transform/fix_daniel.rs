//! Restructures Septuagint Daniel.
//!
//! LXX sources publish the Greek additions to Daniel as separate books.
//! This folds them back into Daniel using the usual numbering:
//!
//! 1. Prayer of Azarias 1:28 and 1:29 become one verse.
//! 2. Prayer of Azarias 1:30.. shift down by one.
//! 3. Susanna 1 becomes Daniel 13.
//! 4. Bel and the Dragon 1 becomes Daniel 14.
//! 5. Daniel 3:23.. move to Daniel 3:91...
//! 6. Prayer of Azarias 1 is inserted as Daniel 3:25...
//!
//! Daniel 3:23 and 3:24 end up missing. The three source books are removed
//! and every Daniel chapter is sorted by verse number.

use std::collections::BTreeMap;

use crate::bible::{Bible, Location, OrderedMap, Testament};

use super::TransformError;

const NAME: &str = "fix_daniel";
const DANIEL: &str = "daniel";
const AZARIAS: &str = "prayer of azarias";
const SUSANNA: &str = "susanna";
const BEL: &str = "bel and the dragon";

/// Daniel 3 verses from here on move by [`DANIEL_3_SHIFT`].
const DANIEL_3_MOVE_FROM: i32 = 23;
const DANIEL_3_SHIFT: i32 = 68;
/// Azarias verse `n` lands on Daniel 3:`n + AZARIAS_OFFSET`.
const AZARIAS_OFFSET: i32 = 24;

type Verses = BTreeMap<i32, String>;

/// Folds Prayer of Azarias, Susanna and Bel and the Dragon into Daniel.
///
/// # Errors
///
/// [`TransformError::MissingBook`] / [`TransformError::MissingLocation`]
/// when the Bible lacks one of the books or verses the restructuring needs.
pub fn fix_daniel(bible: &Bible) -> Result<Bible, TransformError> {
    let azarias = renumber_azarias(chapter(bible, AZARIAS, 1)?)?;

    let mut daniel: OrderedMap<i32, Verses> = bible
        .book(DANIEL)
        .ok_or_else(|| TransformError::missing_book(NAME, DANIEL))?
        .chapters()
        .map(|(num, chapter)| {
            let verses = chapter
                .verses()
                .map(|(verse, text)| (verse, text.to_string()))
                .collect();
            (num, verses)
        })
        .collect();
    daniel.insert(13, chapter(bible, SUSANNA, 1)?);
    daniel.insert(14, chapter(bible, BEL, 1)?);

    let chapter_3 = daniel.get_mut(&3).ok_or_else(|| {
        TransformError::missing_location(NAME, Location::chapter_level("Daniel", 3, Testament::Old))
    })?;
    let moved: Vec<i32> = chapter_3
        .range(DANIEL_3_MOVE_FROM..)
        .map(|(verse, _)| *verse)
        .collect();
    let moved: Vec<(i32, String)> = moved
        .into_iter()
        .filter_map(|verse| chapter_3.remove(&verse).map(|text| (verse, text)))
        .collect();
    for (verse, text) in moved {
        chapter_3.insert(verse + DANIEL_3_SHIFT, text);
    }
    for (verse, text) in azarias {
        chapter_3.insert(verse + AZARIAS_OFFSET, text);
    }

    let mut out = bible.clone();
    for removed in [AZARIAS, SUSANNA, BEL] {
        out.remove_book(removed);
    }
    out.replace_chapters(
        DANIEL,
        daniel
            .iter()
            .map(|(num, verses)| (*num, verses.clone().into_iter())),
    )
    .map_err(|error| TransformError::storage(NAME, error))?;
    Ok(out)
}

fn renumber_azarias(mut verses: Verses) -> Result<Verses, TransformError> {
    let missing = |verse| {
        TransformError::missing_location(
            NAME,
            Location::with_testament("Prayer of Azarias", 1, verse, Testament::Old),
        )
    };
    let merged_tail = verses.remove(&29).ok_or_else(|| missing(29))?;
    let head = verses.get_mut(&28).ok_or_else(|| missing(28))?;
    head.push(' ');
    head.push_str(&merged_tail);

    let Some(&max_verse) = verses.keys().next_back() else {
        return Ok(verses);
    };
    for verse in 30..=max_verse {
        if let Some(text) = verses.remove(&verse) {
            verses.insert(verse - 1, text);
        }
    }
    Ok(verses)
}

fn chapter(bible: &Bible, book: &str, number: i32) -> Result<Verses, TransformError> {
    let found = bible
        .book(book)
        .ok_or_else(|| TransformError::missing_book(NAME, book))?;
    let chapter = found.chapter(number).ok_or_else(|| {
        TransformError::missing_location(
            NAME,
            Location::chapter_level(found.name(), number, Testament::Old),
        )
    })?;
    Ok(chapter
        .verses()
        .map(|(verse, text)| (verse, text.to_string()))
        .collect())
}
