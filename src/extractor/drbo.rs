//! Douay-Rheims Bible from drbo.org.
//!
//! The index page lists books in `td.OT1`/`td.OT2` (Old Testament) and
//! `td.NT` cells. Each book link opens chapter 1, whose `table.chapnumtable`
//! links the other chapters. Verse text sits in `table.texttable td.textarea
//! p` paragraphs where `[N]` anchors mark verse starts.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::bible::{Bible, Location, OrderedMap, Testament, canonicalize_book_name, category};

use super::html::{
    Element, compile_static_regex, elements, elements_with_class, join_url, text_content,
    with_trailing_slash,
};
use super::{ExtractContext, ExtractError, Extractor, PageFetcher, store};

const NAME: &str = "drbo";
const DEFAULT_BASE_URL: &str = "http://www.drbo.org/";
const BIBLE_NAME: &str = "Douay-Rheims Bible";

static VERSE_ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"^\s*\[\s*(\d+)\s*\]\s*$"));
static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?is)<a\b[^>]*>(.*?)</a\s*>"));

/// Scraper for the Douay-Rheims Bible.
pub struct DrboExtractor {
    fetcher: PageFetcher,
    base_url: String,
}

impl DrboExtractor {
    /// # Errors
    ///
    /// [`ExtractError::Http`] when HTTP client construction fails.
    pub fn new() -> Result<Self, ExtractError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Extractor reading from another host, for tests.
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

impl std::fmt::Debug for DrboExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrboExtractor")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Extractor for DrboExtractor {
    fn name(&self) -> &str {
        NAME
    }

    fn url(&self) -> &str {
        DEFAULT_BASE_URL
    }

    fn bible_name(&self) -> &str {
        BIBLE_NAME
    }

    #[tracing::instrument(skip(self, ctx), fields(extractor = NAME))]
    async fn extract(&self, ctx: &ExtractContext) -> Result<Bible, ExtractError> {
        let fetcher = self.fetcher.clone().with_delay(ctx.request_delay);
        let mut progress = ctx.progress(NAME);
        let mut bible = Bible::new(BIBLE_NAME);

        let index = fetcher.text(&self.base_url).await?;
        let books = book_links(&index);
        if books.is_empty() {
            return Err(ExtractError::parse(&self.base_url, "no book links found"));
        }
        progress.set_total(books.len());

        for (book_index, (book, (testament, href))) in books.iter().enumerate() {
            progress.starting(book_index, &format!("Extracting book {book}"));
            let Some(first_url) = join_url(&self.base_url, href) else {
                bible.warn(
                    Location::book_level(book.as_str(), *testament),
                    format!("Unusable book link '{href}'"),
                    category::UNKNOWN_CHAPTER_NUM,
                );
                continue;
            };
            let first_page = fetcher.text(&first_url).await?;

            let chapter_base = join_url(&self.base_url, "chapter/").unwrap_or_else(|| first_url.clone());
            let chapters = chapter_links(&mut bible, book, *testament, &first_page, &first_url, &chapter_base);
            let chapter_count = chapters.len();

            for (chapter, url) in chapters.iter() {
                progress.note(&format!("Extracting chapter {chapter}/{chapter_count} of {book}"));
                let page = if *chapter == 1 {
                    first_page.clone()
                } else {
                    fetcher.text(url).await?
                };
                parse_chapter(&mut bible, book, *chapter, *testament, &page)?;
            }
            progress.finishing(book_index, &format!("Extracted book {book}"));
        }

        progress.finish(&format!("Extracted {} verses from {NAME}", bible.len()));
        Ok(bible)
    }
}

/// Book name → (testament, link), in page order.
///
/// Old Testament names are canonicalized so Greek/Latin duplicates listed
/// by the site collapse, then Douay Kings numbering is mapped onto
/// Samuel/Kings.
fn book_links(index: &str) -> OrderedMap<String, (Testament, String)> {
    let mut books = OrderedMap::new();
    for cell in elements(index, "td") {
        let testament = if cell.has_class("OT1") || cell.has_class("OT2") {
            Testament::Old
        } else if cell.has_class("NT") {
            Testament::New
        } else {
            continue;
        };
        for link in elements(cell.inner, "a").into_iter().filter(|a| a.has_class("b")) {
            let Some(href) = link.attr("href") else {
                continue;
            };
            let label = leading_text(&link);
            if label.is_empty() {
                continue;
            }
            let name = match testament {
                Testament::Old => douay_kings(&canonicalize_book_name(&label)),
                _ => label,
            };
            if !books.contains_key(&name) {
                books.insert(name, (testament, href));
            }
        }
    }
    books
}

/// Text before the first nested tag, e.g. `Genesis` in `Genesis<br><i>..</i>`.
fn leading_text(link: &Element<'_>) -> String {
    let head = link.inner.split('<').next().unwrap_or_default();
    text_content(head)
}

/// Douay 1-4 Kings are Samuel I/II and Kings I/II elsewhere.
fn douay_kings(name: &str) -> String {
    match name {
        "Kings I" => "Samuel I",
        "Kings II" => "Samuel II",
        "Kings III" => "Kings I",
        "Kings IV" => "Kings II",
        other => other,
    }
    .to_string()
}

/// Chapter number → page URL; chapter 1 is the book link itself.
fn chapter_links(
    bible: &mut Bible,
    book: &str,
    testament: Testament,
    first_page: &str,
    first_url: &str,
    chapter_base: &str,
) -> OrderedMap<i32, String> {
    let mut chapters = OrderedMap::new();
    chapters.insert(1, first_url.to_string());
    for table in elements_with_class(first_page, "table", "chapnumtable") {
        for link in elements(table.inner, "a") {
            let label = link.text();
            let Ok(number) = label.parse::<i32>() else {
                bible.warn(
                    Location::book_level(book, testament),
                    format!("Unknown chapter number {label}"),
                    category::UNKNOWN_CHAPTER_NUM,
                );
                continue;
            };
            if chapters.contains_key(&number) {
                bible.warn(
                    Location::chapter_level(book, number, testament),
                    format!("Found chapter {number} twice"),
                    category::MULTIPLE_CHAPTERS,
                );
                continue;
            }
            let Some(url) = link.attr("href").and_then(|href| join_url(chapter_base, &href)) else {
                continue;
            };
            chapters.insert(number, url);
        }
    }
    chapters
}

fn parse_chapter(
    bible: &mut Bible,
    book: &str,
    chapter: i32,
    testament: Testament,
    page: &str,
) -> Result<(), ExtractError> {
    let paragraphs = elements_with_class(page, "table", "texttable")
        .into_iter()
        .flat_map(|table| elements_with_class(table.inner, "td", "textarea"))
        .flat_map(|cell| elements(cell.inner, "p"));

    for paragraph in paragraphs {
        if paragraph.has_class("desc") || paragraph.has_class("note") {
            continue;
        }
        let anchors: Vec<_> = ANCHOR_RE.captures_iter(paragraph.inner).collect();
        if anchors.is_empty() {
            bible.warn(
                Location::chapter_level(book, chapter, testament),
                "Empty paragraph",
                category::EMPTY_VERSE,
            );
            continue;
        }
        for (position, anchor) in anchors.iter().enumerate() {
            let (Some(whole), Some(label)) = (anchor.get(0), anchor.get(1)) else {
                continue;
            };
            let label = text_content(label.as_str());
            let Some(verse) = VERSE_ANCHOR_RE
                .captures(&label)
                .and_then(|caps| caps[1].parse::<i32>().ok())
            else {
                bible.warn(
                    Location::chapter_level(book, chapter, testament),
                    format!("Unable to get verse number from '{label}'"),
                    category::UNKNOWN_VERSE_NUM,
                );
                continue;
            };
            let text_end = anchors
                .get(position + 1)
                .and_then(|next| next.get(0))
                .map_or(paragraph.inner.len(), |next| next.start());
            let text = text_content(&paragraph.inner[whole.end()..text_end]);
            store(
                bible,
                NAME,
                &Location::with_testament(book, chapter, verse, testament),
                text,
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const INDEX: &str = r#"
        <table><tr>
        <td class="OT1"><a class="b" href="chapter/01001.htm">Genesis</a>
            <a class="b" href="chapter/11001.htm">3 Kings<br><i>1 Kings</i></a></td>
        <td class="OT2"><a class="b" href="chapter/09001.htm">1 Kings</a>
            <a class="b" href="chapter/26001.htm">Josue</a></td>
        <td class="other"><a class="b" href="x.htm">Ignored</a></td>
        <td class="NT"><a class="b" href="chapter/47001.htm">Matthew</a></td>
        </tr></table>"#;

    const CHAPTER: &str = r##"
        <table class="chapnumtable"><tr><td><a href="01002.htm">2</a><a href="01002b.htm">2</a><a href="x.htm">II</a></td></tr></table>
        <table class="texttable"><tr><td class="textarea">
          <p class="desc">God createth heaven and earth.</p>
          <p><a href="#1">[1]</a> In the beginning God created heaven, and earth.
             <a href="#2">[2]</a> And the earth was void and empty.</p>
          <p class="note">A note.</p>
          <p>No anchors here</p>
          <p><a>[x]</a> lost <a>[3]</a> And God said: Be light made.</p>
        </td></tr></table>"##;

    #[test]
    fn test_book_links_classify_and_rename() {
        let books = book_links(INDEX);
        let names: Vec<&str> = books.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Genesis", "Kings I", "Samuel I", "Joshua", "Matthew"]);
        assert_eq!(books.get(&"Matthew".to_string()).unwrap().0, Testament::New);
        assert_eq!(
            books.get(&"Kings I".to_string()).unwrap().1,
            "chapter/11001.htm"
        );
    }

    #[test]
    fn test_chapter_links_warn_on_duplicates_and_garbage() {
        let mut bible = Bible::new("t");
        let links = chapter_links(
            &mut bible,
            "Genesis",
            Testament::Old,
            CHAPTER,
            "http://www.drbo.org/chapter/01001.htm",
            "http://www.drbo.org/chapter/",
        );
        assert_eq!(links.len(), 2);
        assert_eq!(
            links.get(&2).unwrap(),
            "http://www.drbo.org/chapter/01002.htm"
        );
        let categories: Vec<&str> = bible.warnings().iter().map(|w| w.category()).collect();
        assert_eq!(
            categories,
            vec![category::MULTIPLE_CHAPTERS, category::UNKNOWN_CHAPTER_NUM]
        );
    }

    #[test]
    fn test_parse_chapter_splits_on_anchors() {
        let mut bible = Bible::new("t");
        parse_chapter(&mut bible, "Genesis", 1, Testament::Old, CHAPTER).unwrap();
        assert_eq!(
            bible.text(&Location::new("Genesis", 1, 1)),
            Some("In the beginning God created heaven, and earth.")
        );
        assert_eq!(
            bible.text(&Location::new("Genesis", 1, 2)),
            Some("And the earth was void and empty.")
        );
        assert_eq!(
            bible.text(&Location::new("Genesis", 1, 3)),
            Some("And God said: Be light made.")
        );
        assert_eq!(bible.len(), 3);
        let categories: Vec<&str> = bible.warnings().iter().map(|w| w.category()).collect();
        assert_eq!(categories, vec![category::EMPTY_VERSE, category::UNKNOWN_VERSE_NUM]);
    }
}
