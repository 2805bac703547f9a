//! King James Version from jesus-is-lord.com.
//!
//! The second table of the index page links every book, under an
//! "Old Testament" and a "New Testament" heading. A book page is one flow of
//! `MsoNormal` paragraphs: `CHAPTER N` paragraphs split it into chapters, the
//! paragraph right after a marker is a heading, and the remaining paragraphs
//! whose first word starts with a digit are verses, numbered by position.

use std::collections::HashSet;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::bible::{Bible, Location, Testament};

use super::html::{compile_static_regex, elements, elements_with_class, join_url, open_tag_positions};
use super::{ExtractContext, ExtractError, Extractor, PageFetcher, store};

const NAME: &str = "jesus";
const DEFAULT_URL: &str = "http://www.jesus-is-lord.com/thebible.htm";
const BIBLE_NAME: &str = "King James Version";
const OLD_HEADING: &str = "Old Testament";
const NEW_HEADING: &str = "New Testament";

static CHAPTER_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"^\s*CHAPTER\s+\d+\s*$"));
static LEADING_DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"^\d+"));

/// Scraper for the KJV pages on jesus-is-lord.com.
pub struct JesusIsLordExtractor {
    fetcher: PageFetcher,
    index_url: String,
}

impl JesusIsLordExtractor {
    /// # Errors
    ///
    /// [`ExtractError::Http`] when HTTP client construction fails.
    pub fn new() -> Result<Self, ExtractError> {
        Self::with_index_url(DEFAULT_URL)
    }

    /// Extractor starting from another index page, for tests.
    ///
    /// # Errors
    ///
    /// [`ExtractError::Http`] when HTTP client construction fails.
    pub fn with_index_url(index_url: impl Into<String>) -> Result<Self, ExtractError> {
        Ok(Self {
            fetcher: PageFetcher::new(NAME)?,
            index_url: index_url.into(),
        })
    }
}

impl std::fmt::Debug for JesusIsLordExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JesusIsLordExtractor")
            .field("index_url", &self.index_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Extractor for JesusIsLordExtractor {
    fn name(&self) -> &str {
        NAME
    }

    fn url(&self) -> &str {
        DEFAULT_URL
    }

    fn bible_name(&self) -> &str {
        BIBLE_NAME
    }

    #[tracing::instrument(skip(self, ctx), fields(extractor = NAME))]
    async fn extract(&self, ctx: &ExtractContext) -> Result<Bible, ExtractError> {
        let fetcher = self.fetcher.clone().with_delay(ctx.request_delay);
        let mut progress = ctx.progress(NAME);
        let mut bible = Bible::new(BIBLE_NAME);

        let index = fetcher.text(&self.index_url).await?;
        let books = book_links(&index).map_err(|reason| ExtractError::parse(&self.index_url, reason))?;
        progress.set_total(books.len());

        for (position, (book, testament, href)) in books.iter().enumerate() {
            progress.starting(position, &format!("Extracting book {book} ('{href}')"));
            let Some(url) = join_url(&self.index_url, href) else {
                continue;
            };
            let page = fetcher.text(&url).await?;
            let paragraphs: Vec<String> = elements_with_class(&page, "p", "MsoNormal")
                .iter()
                .map(|p| p.text())
                .collect();
            for (chapter, verses) in chapters(&paragraphs) {
                progress.note(&format!(
                    "Processing chapter {chapter} of {book} with {} verses",
                    verses.len()
                ));
                for (verse, text) in verses {
                    store(
                        &mut bible,
                        NAME,
                        &Location::with_testament(book.as_str(), chapter, verse, *testament),
                        text,
                    )?;
                }
            }
        }

        progress.finish(&format!("Extracted {} verses from {NAME}", bible.len()));
        Ok(bible)
    }
}

/// `(book, testament, href)` from the index's second table, in page order.
fn book_links(index: &str) -> Result<Vec<(String, Testament, String)>, &'static str> {
    let tables = open_tag_positions(index, "table");
    let Some(&second) = tables.get(1) else {
        return Err("expected at least two tables");
    };
    let region = &index[second..];
    let Some(old_at) = region.find(OLD_HEADING) else {
        return Err("missing Old Testament heading");
    };
    let new_at = region.find(NEW_HEADING).unwrap_or(region.len());

    let mut seen = HashSet::new();
    let mut books = Vec::new();
    for link in elements(region, "a") {
        let testament = if link.start > new_at {
            Testament::New
        } else if link.start > old_at {
            Testament::Old
        } else {
            continue;
        };
        let (Some(href), name) = (link.attr("href"), link.text()) else {
            continue;
        };
        if name.is_empty() || !seen.insert(name.to_lowercase()) {
            continue;
        }
        books.push((name, testament, href));
    }
    Ok(books)
}

/// Splits a book's paragraphs into `(chapter, [(verse, text)])`.
fn chapters(paragraphs: &[String]) -> Vec<(i32, Vec<(i32, String)>)> {
    let markers: Vec<usize> = paragraphs
        .iter()
        .enumerate()
        .filter(|(_, text)| CHAPTER_MARKER_RE.is_match(text))
        .map(|(index, _)| index)
        .collect();

    let mut result = Vec::with_capacity(markers.len());
    for (chapter_index, &marker) in markers.iter().enumerate() {
        let end = markers.get(chapter_index + 1).copied().unwrap_or(paragraphs.len());
        let body = paragraphs.get(marker + 2..end).unwrap_or_default();
        let verses = body
            .iter()
            .filter_map(|text| {
                let mut words = text.split(' ');
                let first = words.next()?;
                LEADING_DIGIT_RE
                    .is_match(first)
                    .then(|| words.collect::<Vec<_>>().join(" "))
            })
            .zip(1..)
            .map(|(text, verse)| (verse, text))
            .collect();
        let chapter = i32::try_from(chapter_index + 1).unwrap_or(i32::MAX);
        result.push((chapter, verses));
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_book_links_split_by_heading() {
        let index = r#"<table><tr><td><a href="home.htm">Home</a></td></tr></table>
            <table>
              <tr><td><a href="intro.htm">Intro</a></td></tr>
              <tr><td><b>Old Testament</b><br>
                <a href="genesis.htm">Genesis</a> <a href="exodus.htm">Exodus</a>
                <a href="GENESIS2.htm">GENESIS</a></td></tr>
              <tr><td><b>New Testament</b><br><a href="matthew.htm">Matthew</a></td></tr>
            </table>"#;
        let books = book_links(index).unwrap();
        assert_eq!(
            books,
            vec![
                ("Genesis".to_string(), Testament::Old, "genesis.htm".to_string()),
                ("Exodus".to_string(), Testament::Old, "exodus.htm".to_string()),
                ("Matthew".to_string(), Testament::New, "matthew.htm".to_string()),
            ]
        );
    }

    #[test]
    fn test_book_links_need_second_table() {
        assert!(book_links("<table></table>").is_err());
    }

    #[test]
    fn test_chapters_number_verses_by_position() {
        let paragraphs: Vec<String> = [
            "The First Book of Moses",
            "CHAPTER 1",
            "Creation",
            "1 In the beginning God created the heaven and the earth.",
            "2a And the earth was without form.",
            "(a note)",
            "3 And God said, Let there be light.",
            " CHAPTER 2 ",
            "The sabbath",
            "1 Thus the heavens and the earth were finished.",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        let chapters = chapters(&paragraphs);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].0, 1);
        assert_eq!(
            chapters[0].1,
            vec![
                (1, "In the beginning God created the heaven and the earth.".to_string()),
                (2, "And the earth was without form.".to_string()),
                (3, "And God said, Let there be light.".to_string()),
            ]
        );
        assert_eq!(chapters[1].0, 2);
        assert_eq!(chapters[1].1.len(), 1);
    }

    #[test]
    fn test_no_markers_no_chapters() {
        assert!(chapters(&["1 text".to_string()]).is_empty());
    }
}
