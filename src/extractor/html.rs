//! Regex-based HTML helpers shared by the site extractors.
//!
//! The scraped sites serve flat, table-based markup, so elements are located
//! with non-nesting patterns: [`elements`] finds `<tag ...>...</tag>` up to
//! the first matching close tag.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Compiles a regex at static init; panics on invalid pattern.
pub fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?s)<[^>]*>"));
static BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?i)<br\s*/?>|</p>|</div>"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"\s+"));
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);"));
static CLASS_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r#"(?is)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
});

/// One matched element: raw attribute text and inner HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<'a> {
    pub attrs: &'a str,
    pub inner: &'a str,
    /// Byte offset of the element start in the searched text
    pub start: usize,
    /// Byte offset just past the close tag
    pub end: usize,
}

impl Element<'_> {
    /// Whitespace-separated values of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        class_list(self.attrs).split_whitespace()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c.eq_ignore_ascii_case(class))
    }

    /// Value of attribute `name`, entity-decoded.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<String> {
        attribute(self.attrs, name)
    }

    /// Visible text with whitespace collapsed.
    #[must_use]
    pub fn text(&self) -> String {
        text_content(self.inner)
    }
}

/// All `<tag ...>...</tag>` elements in document order.
///
/// Elements of the same tag must not nest.
#[must_use]
pub fn elements<'a>(html: &'a str, tag: &str) -> Vec<Element<'a>> {
    let pattern = format!(r"(?is)<{tag}\b([^>]*)>(.*?)</{tag}\s*>");
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };
    re.captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Element {
                attrs: caps.get(1).map_or("", |m| m.as_str()),
                inner: caps.get(2).map_or("", |m| m.as_str()),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Elements of `tag` carrying `class`.
#[must_use]
pub fn elements_with_class<'a>(html: &'a str, tag: &str, class: &str) -> Vec<Element<'a>> {
    elements(html, tag)
        .into_iter()
        .filter(|element| element.has_class(class))
        .collect()
}

/// Byte offsets of every opening `<tag` in `html`.
#[must_use]
pub fn open_tag_positions(html: &str, tag: &str) -> Vec<usize> {
    let pattern = format!(r"(?i)<{tag}\b");
    Regex::new(&pattern)
        .map(|re| re.find_iter(html).map(|m| m.start()).collect())
        .unwrap_or_default()
}

/// Raw text of the `class` attribute in an attribute list.
#[must_use]
pub fn class_list(attrs: &str) -> &str {
    CLASS_ATTR_RE
        .captures(attrs)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map_or("", |m| m.as_str())
}

/// Value of attribute `name` in an attribute list, entity-decoded.
#[must_use]
pub fn attribute(attrs: &str, name: &str) -> Option<String> {
    let pattern = format!(r#"(?is)\b{name}\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#);
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(attrs)?;
    let value = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
    Some(decode_entities(value.as_str()))
}

/// Removes all tags; block-level breaks become spaces.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    let spaced = BREAK_RE.replace_all(html, " ");
    TAG_RE.replace_all(&spaced, "").into_owned()
}

/// Decodes numeric and the common named character references.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body
                .strip_prefix("#x")
                .or_else(|| body.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(body)
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "rsquo" => '\u{2019}',
        "lsquo" => '\u{2018}',
        "rdquo" => '\u{201d}',
        "ldquo" => '\u{201c}',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "hellip" => '\u{2026}',
        _ => return None,
    })
}

/// Collapses whitespace runs to one space and trims.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Visible text of an HTML fragment.
#[must_use]
pub fn text_content(html: &str) -> String {
    collapse_whitespace(&decode_entities(&strip_tags(html)))
}

/// Resolves a possibly relative link against `base`.
#[must_use]
pub fn join_url(base: &str, link: &str) -> Option<String> {
    if link.starts_with("http://") || link.starts_with("https://") {
        return Some(link.to_string());
    }
    Url::parse(base)
        .ok()?
        .join(link)
        .ok()
        .map(|url| url.to_string())
}

/// Makes sure `base` ends with `/` so relative joins append to it.
#[must_use]
pub fn with_trailing_slash(base: impl Into<String>) -> String {
    let mut base = base.into();
    if !base.ends_with('/') {
        base.push('/');
    }
    base
}
