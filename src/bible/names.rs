//! Book-name canonicalization.
//!
//! Scraped sources spell the same book differently: `"3 Kings"`, `"III Kings"`
//! and `"Kings III"` all show up, as do Latin/Greek-derived names such as
//! `"Josue"`. [`canonicalize_book_name`] maps all of them to one spelling so
//! that books from different sources collide when merged.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Largest value representable with standard Roman numerals.
const MAX_ROMAN: u32 = 3999;

const ROMAN_TABLE: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Old Greek/Latin spellings mapped to standard names.
///
/// No target appears as a key, so a second pass is always a no-op.
const ALTERNATE_NAMES: &[(&str, &str)] = &[
    ("josue", "Joshua"),
    ("paralipomenon i", "Chronicles I"),
    ("paralipomenon ii", "Chronicles II"),
    ("esdras i", "Ezra"),
    ("esdras ii", "Nehemiah"),
    ("tobias", "Tobit"),
    ("canticle of canticles", "Song of Solomon"),
    ("ecclesiasticus", "Sirach"),
    ("isaias", "Isaiah"),
    ("jeremias", "Jeremiah"),
    ("ezechiel", "Ezekiel"),
    ("osee", "Hosea"),
    ("abdias", "Obadiah"),
    ("jonas", "Jonah"),
    ("micheas", "Micah"),
    ("habacuc", "Habakkuk"),
    ("sophonias", "Zephaniah"),
    ("aggeus", "Haggai"),
    ("zacharias", "Zechariah"),
    ("malachias", "Malachi"),
    ("machabees i", "Maccabees I"),
    ("machabees ii", "Maccabees II"),
    ("apocalypse", "Revelation"),
];

static ALTERNATE_NAME_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ALTERNATE_NAMES.iter().copied().collect());

/// Converts a raw scraped book name into its canonical spelling.
///
/// Rules, first match wins:
/// 1. `"<integer> <rest>"` becomes `"<rest> <ROMAN>"` (`"3 Kings"` → `"Kings III"`).
/// 2. `"<ROMAN> <rest>"` becomes `"<rest> <ROMAN>"` (`"III Kings"` → `"Kings III"`).
/// 3. Anything else is kept.
///
/// The result is then looked up (lowercased) in the alternate-name table.
/// Malformed numbers fall through to the next rule; the function never fails.
///
/// ```
/// use bible_extractor_core::bible::canonicalize_book_name;
///
/// assert_eq!(canonicalize_book_name("3 Kings"), "Kings III");
/// assert_eq!(canonicalize_book_name("III Kings"), "Kings III");
/// assert_eq!(canonicalize_book_name("Josue"), "Joshua");
/// ```
#[must_use]
pub fn canonicalize_book_name(raw_name: &str) -> String {
    let name = raw_name.trim();
    let reordered = numeric_prefix(name)
        .or_else(|| roman_prefix(name))
        .unwrap_or_else(|| name.to_string());

    match ALTERNATE_NAME_MAP.get(reordered.to_lowercase().as_str()) {
        Some(standard) => (*standard).to_string(),
        None => reordered,
    }
}

fn numeric_prefix(name: &str) -> Option<String> {
    let (token, rest) = split_prefix(name)?;
    let number = token.parse::<u32>().ok()?;
    let roman = to_roman(number)?;
    Some(format!("{rest} {roman}"))
}

fn roman_prefix(name: &str) -> Option<String> {
    let (token, rest) = split_prefix(name)?;
    let number = from_roman(token)?;
    let roman = to_roman(number)?;
    Some(format!("{rest} {roman}"))
}

fn split_prefix(name: &str) -> Option<(&str, &str)> {
    let (token, rest) = name.split_once(' ')?;
    let rest = rest.trim();
    if token.is_empty() || rest.is_empty() || starts_with_number(rest) {
        return None;
    }
    Some((token, rest))
}

// A second number after the prefix would be moved again on the next pass.
fn starts_with_number(rest: &str) -> bool {
    let first = rest.split(' ').next().unwrap_or_default();
    first.parse::<u32>().is_ok() || from_roman(first).is_some()
}

/// Renders `1..=3999` as an uppercase Roman numeral.
#[must_use]
pub fn to_roman(mut number: u32) -> Option<String> {
    if number == 0 || number > MAX_ROMAN {
        return None;
    }
    let mut out = String::new();
    for (value, symbol) in ROMAN_TABLE {
        while number >= value {
            out.push_str(symbol);
            number -= value;
        }
    }
    Some(out)
}

/// Parses a strictly-formed uppercase Roman numeral.
///
/// Non-canonical forms such as `"IIII"` or `"VX"` are rejected, which keeps
/// ordinary words made of numeral letters from being read as numbers.
#[must_use]
pub fn from_roman(token: &str) -> Option<u32> {
    if token.is_empty() {
        return None;
    }
    let mut total = 0u32;
    let mut previous = u32::MAX;
    for ch in token.chars().rev() {
        let value = match ch {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        };
        if previous != u32::MAX && value < previous {
            total = total.checked_sub(value)?;
        } else {
            total = total.checked_add(value)?;
        }
        previous = value;
    }
    (to_roman(total)?.as_str() == token).then_some(total)
}
