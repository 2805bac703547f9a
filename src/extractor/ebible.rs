//! Septuagint in American English from ebible.org.
//!
//! `info.json` lists the books (`divisionNames`), their section-code
//! prefixes (`divisions`) and every chapter section code (`sections`). Each
//! section page marks verse starts with `span.v-num` carrying a `v-N` or
//! `v-N-M` class; the latter is a verse range.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use crate::bible::{Bible, Location, Testament, category};

use super::html::{class_list, compile_static_regex, text_content, with_trailing_slash};
use super::{ExtractContext, ExtractError, Extractor, PageFetcher, store};

const NAME: &str = "ebible";
const SOURCE_URL: &str = "http://ebible.org/eng-lxx2012/";
const DEFAULT_BASE_URL: &str = "http://ebible.org/study/content/texts/ENGLXX/";
const BIBLE_NAME: &str = "Septuagint in American English";

static CHAPTER_NUM_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"^[^\d]*(\d+)$"));
static VERSE_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"^v-(\d+)(?:-(\d+))?$"));
static SPAN_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?is)<span\b([^>]*)>"));
static VERSE_END_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?i)</div\s*>"));

/// Book metadata document.
#[derive(Debug, Clone, Deserialize)]
struct TextInfo {
    #[serde(rename = "divisionNames")]
    division_names: Vec<String>,
    divisions: Vec<String>,
    sections: Vec<String>,
}

impl TextInfo {
    /// `(book name, section codes)` in document order.
    fn books(&self) -> Vec<(&str, Vec<&str>)> {
        self.division_names
            .iter()
            .zip(&self.divisions)
            .map(|(name, prefix)| {
                let sections = self
                    .sections
                    .iter()
                    .filter(|code| code.starts_with(prefix.as_str()))
                    .map(String::as_str)
                    .collect();
                (name.as_str(), sections)
            })
            .collect()
    }
}

/// Scraper for the Septuagint. Every book is Old Testament.
pub struct EbibleExtractor {
    fetcher: PageFetcher,
    base_url: String,
}

impl EbibleExtractor {
    /// # Errors
    ///
    /// [`ExtractError::Http`] when HTTP client construction fails.
    pub fn new() -> Result<Self, ExtractError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Extractor reading `info.json` and section pages under `base_url`.
    ///
    /// # Errors
    ///
    /// [`ExtractError::Http`] when HTTP client construction fails.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ExtractError> {
        Ok(Self {
            fetcher: PageFetcher::new(NAME)?,
            base_url: with_trailing_slash(base_url),
        })
    }
}

impl std::fmt::Debug for EbibleExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EbibleExtractor")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Extractor for EbibleExtractor {
    fn name(&self) -> &str {
        NAME
    }

    fn url(&self) -> &str {
        SOURCE_URL
    }

    fn bible_name(&self) -> &str {
        BIBLE_NAME
    }

    #[tracing::instrument(skip(self, ctx), fields(extractor = NAME))]
    async fn extract(&self, ctx: &ExtractContext) -> Result<Bible, ExtractError> {
        let fetcher = self.fetcher.clone().with_delay(ctx.request_delay);
        let mut progress = ctx.progress(NAME);
        let mut bible = Bible::new(BIBLE_NAME);

        let info: TextInfo = fetcher.json(&format!("{}info.json", self.base_url)).await?;
        let books = info.books();
        progress.set_total(books.iter().map(|(_, sections)| sections.len()).sum());

        let mut step = 0usize;
        for (book, sections) in books {
            for code in sections {
                progress.starting(step, &format!("Extracting chapter {code} in {book}"));
                step += 1;
                let Some(chapter) = chapter_number(code, &info, book) else {
                    bible.warn(
                        Location::book_level(book, Testament::Old),
                        format!("Unknown chapter number. Chapter code is {code}"),
                        category::UNKNOWN_CHAPTER_NUM,
                    );
                    continue;
                };
                let page = fetcher.text(&format!("{}{code}.html", self.base_url)).await?;
                parse_section(&mut bible, book, chapter, &page)?;
            }
        }

        progress.finish(&format!("Extracted {} verses from {NAME}", bible.len()));
        Ok(bible)
    }
}

/// Chapter number from a section code, after the book's division prefix.
fn chapter_number(code: &str, info: &TextInfo, book: &str) -> Option<i32> {
    let prefix = info
        .division_names
        .iter()
        .position(|name| name == book)
        .and_then(|index| info.divisions.get(index))
        .map_or("", String::as_str);
    let tail = code.strip_prefix(prefix).unwrap_or(code);
    CHAPTER_NUM_RE
        .captures(tail)
        .and_then(|caps| caps[1].parse().ok())
}

fn parse_section(
    bible: &mut Bible,
    book: &str,
    chapter: i32,
    page: &str,
) -> Result<(), ExtractError> {
    // (verse class, end of the v-num span, start of the v-num span)
    let markers: Vec<(Option<(i32, Option<i32>)>, usize, usize)> = SPAN_OPEN_RE
        .captures_iter(page)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let classes = class_list(caps.get(1)?.as_str());
            if !classes.split_whitespace().any(|class| class == "v-num") {
                return None;
            }
            let number = classes
                .split_whitespace()
                .find_map(|class| VERSE_CLASS_RE.captures(class))
                .and_then(|caps| {
                    let first = caps[1].parse::<i32>().ok()?;
                    let last = caps.get(2).and_then(|m| m.as_str().parse::<i32>().ok());
                    Some((first, last))
                });
            let content_end = page[whole.end()..]
                .find("</span>")
                .map_or(whole.end(), |offset| whole.end() + offset + "</span>".len());
            Some((number, content_end, whole.start()))
        })
        .collect();

    let here = Location::chapter_level(book, chapter, Testament::Old);
    for (position, (number, text_start, _)) in markers.iter().enumerate() {
        let Some((verse, last)) = *number else {
            bible.warn(here.clone(), "Cannot find verses", category::CANNOT_FIND_VERSE);
            continue;
        };
        let next_marker = markers
            .get(position + 1)
            .map_or(page.len(), |next| next.2)
            .max(*text_start);
        let block_end = VERSE_END_RE
            .find(&page[*text_start..next_marker])
            .map_or(next_marker, |m| text_start + m.start());
        let text = text_content(&page[*text_start..block_end]);

        if let Some(last) = last {
            let range: Vec<Location> = (verse..=last)
                .map(|v| Location::with_testament(book, chapter, v, Testament::Old))
                .collect();
            bible.warn(
                range,
                "Found bible range. Merging into the first verse.",
                category::VERSE_RANGE,
            );
        }
        store(
            bible,
            NAME,
            &Location::with_testament(book, chapter, verse, Testament::Old),
            text,
        )?;
    }
    Ok(())
}
