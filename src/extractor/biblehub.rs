//! King James 2000 from biblehub.com.
//!
//! Book names come from the verse-menu `<option>` list, chapter counts from
//! each book's chapter menu (`select[name=select2] > option`). Chapter pages
//! hold `div.chap > p.regular` paragraphs: a `span.reftext` with the verse
//! number followed by text spans.

use std::collections::HashSet;
use std::sync::LazyLock;

use async_trait::async_trait;

use crate::bible::{Bible, Location, Testament, category};

use super::html::{attribute, class_list, elements, open_tag_positions, with_trailing_slash};
use super::{ExtractContext, ExtractError, Extractor, PageFetcher, store};

const NAME: &str = "biblehub";
const SOURCE_URL: &str = "http://biblehub.com/kj2000/";
const DEFAULT_BASE_URL: &str = "http://biblehub.com/";
const BIBLE_NAME: &str = "King James 2000";

/// The site does not mark testaments; New Testament books are listed here.
static NEW_TESTAMENT_BOOKS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "Matthew",
        "Mark",
        "Luke",
        "John",
        "Acts",
        "Romans",
        "1 Corinthians",
        "2 Corinthians",
        "Galatians",
        "Ephesians",
        "Philippians",
        "Colossians",
        "1 Thessalonians",
        "2 Thessalonians",
        "1 Timothy",
        "2 Timothy",
        "Titus",
        "Philemon",
        "Hebrews",
        "James",
        "1 Peter",
        "2 Peter",
        "1 John",
        "2 John",
        "3 John",
        "Jude",
        "Revelation",
    ]
    .into_iter()
    .collect()
});

/// Menu abbreviations expanded to full names.
const ABBREVIATIONS: [(&str, &str); 2] = [
    ("1 Thessalon.", "1 Thessalonians"),
    ("2 Thessalon.", "2 Thessalonians"),
];

/// Scraper for the King James 2000 translation.
pub struct BibleHubExtractor {
    fetcher: PageFetcher,
    base_url: String,
}

impl BibleHubExtractor {
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

    fn books_url(&self) -> String {
        format!("{}menus/versemenus/genesisbookmenu.htm", self.base_url)
    }

    fn chapter_menu_url(&self, book: &str) -> String {
        format!("{}kj2000/cmenus/{}/1.htm", self.base_url, slug(book))
    }

    fn chapter_url(&self, book: &str, chapter: i32) -> String {
        format!("{}kj2000/{}/{chapter}.htm", self.base_url, slug(book))
    }
}

impl std::fmt::Debug for BibleHubExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BibleHubExtractor")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Extractor for BibleHubExtractor {
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

        let books_url = self.books_url();
        let names = book_names(&fetcher.text(&books_url).await?);
        if names.is_empty() {
            return Err(ExtractError::parse(&books_url, "no book options found"));
        }

        // (testament, book, chapter count), Old Testament first
        let mut plan: Vec<(Testament, String, i32)> = Vec::with_capacity(names.len());
        for name in names {
            let testament = testament_of(&name);
            let count = chapter_count(&fetcher.text(&self.chapter_menu_url(&name)).await?);
            if count <= 0 {
                bible.warn(
                    Location::book_level(name.as_str(), testament),
                    format!("Number of chapters is {count}"),
                    category::UNKNOWN_CHAPTER_NUM,
                );
            }
            plan.push((testament, name, count));
        }
        plan.sort_by_key(|(testament, _, _)| *testament == Testament::New);

        let total: usize = plan
            .iter()
            .map(|(_, _, count)| usize::try_from(*count).unwrap_or(0))
            .sum();
        progress.set_total(total);

        let mut step = 0usize;
        for (testament, book, count) in &plan {
            for chapter in 1..=*count {
                progress.starting(step, &format!("Processing chapter {chapter} in {book}"));
                let page = fetcher.text(&self.chapter_url(book, chapter)).await?;
                parse_chapter(&mut bible, book, chapter, *testament, &page)?;
                step += 1;
            }
        }

        progress.finish(&format!("Extracted {} verses from {NAME}", bible.len()));
        Ok(bible)
    }
}

fn slug(book: &str) -> String {
    book.to_lowercase().replace(' ', "_")
}

fn testament_of(book: &str) -> Testament {
    if NEW_TESTAMENT_BOOKS.contains(book) {
        Testament::New
    } else {
        Testament::Old
    }
}

/// Distinct option labels of the book menu, abbreviations expanded.
fn book_names(menu: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    elements(menu, "option")
        .into_iter()
        .map(|option| {
            let label = option.text();
            ABBREVIATIONS
                .iter()
                .find(|(short, _)| *short == label)
                .map_or(label, |(_, full)| (*full).to_string())
        })
        .filter(|name| !name.is_empty() && seen.insert(name.clone()))
        .collect()
}

/// Number of `<option>`s in the `select2` chapter menu.
fn chapter_count(menu: &str) -> i32 {
    let count = elements(menu, "select")
        .into_iter()
        .find(|select| attribute(select.attrs, "name").as_deref() == Some("select2"))
        .map_or(0, |select| elements(select.inner, "option").len());
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Page text from the first `div.chap` on.
fn chapter_region(page: &str) -> Option<&str> {
    open_tag_positions(page, "div").into_iter().find_map(|start| {
        let rest = &page[start..];
        let open_end = rest.find('>')?;
        let is_chap = class_list(&rest[..open_end])
            .split_whitespace()
            .any(|class| class == "chap");
        is_chap.then_some(rest)
    })
}

fn parse_chapter(
    bible: &mut Bible,
    book: &str,
    chapter: i32,
    testament: Testament,
    page: &str,
) -> Result<(), ExtractError> {
    let here = Location::chapter_level(book, chapter, testament);
    let Some(region) = chapter_region(page) else {
        bible.warn(here, "Cannot find chapter text", category::CANNOT_FIND_VERSE);
        return Ok(());
    };

    for paragraph in elements(region, "p").into_iter().filter(|p| p.has_class("regular")) {
        let spans = elements(paragraph.inner, "span");
        let Some(reftext) = spans.iter().find(|span| span.has_class("reftext")) else {
            bible.warn(
                here.clone(),
                "Unable to find verse number",
                category::CANNOT_FIND_VERSE_NUM,
            );
            continue;
        };
        let label = reftext.text();
        let Ok(verse) = label.parse::<i32>() else {
            bible.warn(
                here.clone(),
                format!("Unable to parse verse number '{label}'"),
                category::UNKNOWN_VERSE_NUM,
            );
            continue;
        };
        let text = spans
            .iter()
            .filter(|span| !span.has_class("reftext"))
            .map(|span| span.text())
            .collect::<Vec<_>>()
            .join("\n");
        store(
            bible,
            NAME,
            &Location::with_testament(book, chapter, verse, testament),
            text,
        )?;
    }
    Ok(())
}
