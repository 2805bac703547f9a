//! Integration tests for the Bible model, merge, functions and exports.
//!
//! Tests the full post-extraction flow through the public API.

use bible_extractor_core::export::{from_json_str, to_json_string};
use bible_extractor_core::{
    Bible, BibleStats, Location, SqlTemplate, SqlValue, StatsDiff, Testament, apply_transforms,
    build_default_transform_registry, category, merge,
};

fn old(book: &str, chapter: i32, verse: i32) -> Location {
    Location::with_testament(book, chapter, verse, Testament::Old)
}

fn new(book: &str, chapter: i32, verse: i32) -> Location {
    Location::with_testament(book, chapter, verse, Testament::New)
}

/// Douay-style source: Latin book names, a gap in Genesis 1.
fn douay() -> Bible {
    let mut bible = Bible::new("Douay-Rheims Bible");
    bible.set(&old("Genesis", 1, 1), "In the beginning God created heaven, and earth.").unwrap();
    bible.set(&old("1 Paralipomenon", 1, 1), "Adam, Seth, Enos,").unwrap();
    bible.set(&new("Jude", 1, 1), "Jude, the servant of Jesus Christ").unwrap();
    bible
}

/// Septuagint-style source: fills the gap and reports a verse range there.
fn septuagint() -> Bible {
    let mut bible = Bible::new("Septuagint");
    bible.set(&old("Genesis", 1, 1), "In the beginning God made the heaven and the earth.").unwrap();
    bible.set(&old("Genesis", 1, 2), "But the earth was unsightly and unfurnished.").unwrap();
    bible.set(&old("I Chronicles", 1, 1), "Adam, Seth, Enos,").unwrap();
    bible.set(&old("I Chronicles", 1, 2), "Cainan, Maleleel, Jared,").unwrap();
    bible.warn(
        vec![old("Genesis", 1, 2), old("Genesis", 1, 3)],
        "Found bible range. Merging into the first verse.",
        category::VERSE_RANGE,
    );
    bible.warn(old("Genesis", 1, 1), "Suspicious text", category::UNKNOWN_VERSE_NUM);
    bible
}

#[test]
fn test_merge_prefers_first_source_and_unifies_names() {
    let merged = merge(&[douay(), septuagint()]).unwrap();

    assert_eq!(merged.name(), "Douay-Rheims Bible and Septuagint");
    assert_eq!(
        merged.text(&Location::new("Genesis", 1, 1)),
        Some("In the beginning God created heaven, and earth.")
    );
    assert_eq!(
        merged.text(&Location::new("Genesis", 1, 2)),
        Some("But the earth was unsightly and unfurnished.")
    );
    assert_eq!(
        merged.text(&Location::new("Chronicles I", 1, 2)),
        Some("Cainan, Maleleel, Jared,")
    );
    assert!(merged.book("1 Paralipomenon").is_none());
    assert_eq!(merged.testament_of("Jude"), Some(Testament::New));
    assert_eq!(merged.len(), 5);

    // Only the warning touching the filled gap is carried over.
    let warnings: Vec<_> = merged.warnings().iter().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].category(), category::VERSE_RANGE);
    assert!(warnings[0].text().starts_with("Septuagint: "));
}

#[test]
fn test_functions_then_merge() {
    let registry = build_default_transform_registry();
    let remove_ranges = registry.lookup("remove_ranges").unwrap();
    let remove_new = registry.lookup("remove_new").unwrap();

    let (septuagint, report) = apply_transforms(septuagint(), &[remove_ranges]);
    assert!(report.all_succeeded());
    assert!(!septuagint.contains(&Location::new("Genesis", 1, 2)));

    let (douay, report) = apply_transforms(douay(), &[remove_new]);
    assert!(report.all_succeeded());

    let merged = merge(&[douay, septuagint]).unwrap();
    assert!(!merged.contains(&Location::new("Genesis", 1, 2)));
    assert!(!merged.contains(&Location::new("Jude", 1, 1)));
    assert!(merged.warnings().is_empty());
}

#[test]
fn test_failing_function_keeps_bible() {
    let registry = build_default_transform_registry();
    let fix_daniel = registry.lookup("fix_daniel").unwrap();
    let original = douay();

    let (after, report) = apply_transforms(original.clone(), &[fix_daniel]);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(after, original);
}

#[test]
fn test_persisted_json_round_trip_of_merge() {
    let merged = merge(&[douay(), septuagint()]).unwrap();
    let json = to_json_string(&merged).unwrap();
    let restored = from_json_str(&json).unwrap();

    assert_eq!(restored, merged);
    let books: Vec<&str> = restored.books(Testament::Old).collect();
    assert_eq!(books, vec!["Genesis", "Chronicles I"]);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["order"]["new"], serde_json::json!(["Jude"]));
    assert_eq!(value["warnings"][0]["type"], category::VERSE_RANGE);
}

#[test]
fn test_sql_export_with_custom_template() {
    let template = SqlTemplate::new("t_verses")
        .column("book", SqlValue::Book)
        .column("chapter", SqlValue::Chapter)
        .column("verse", SqlValue::Verse)
        .column("body", SqlValue::Text)
        .column("source", SqlValue::Literal("drb".to_string()));
    let sql = template.render(&douay());
    let statements: Vec<&str> = sql.split(";\n").collect();

    assert_eq!(statements.len(), 3);
    assert_eq!(
        statements[0],
        "INSERT INTO t_verses (book, chapter, verse, body, source)\n\
         VALUES  ('Genesis', 1, 1, 'In the beginning God created heaven, and earth.', 'drb')"
    );
    assert!(sql.ends_with("'Jude, the servant of Jesus Christ', 'drb');"));
}

#[test]
fn test_stats_diff_between_sources() {
    let first = BibleStats::from_bible(&douay().canonicalize_book_names().unwrap());
    let second = BibleStats::from_bible(&septuagint().canonicalize_book_names().unwrap());

    let diff = StatsDiff::compare(&first, &second).with_names("drb", "lxx");
    assert_eq!(diff.only_in_first, vec![("Jude".to_string(), Testament::New)]);
    assert!(diff.only_in_second.is_empty());
    assert_eq!(diff.shared_books, 2);
    assert_eq!(diff.mismatches.len(), 2);

    let report = diff.to_string();
    assert!(report.contains("drb has 1 books not in lxx:"));
    assert!(report.contains("\t- (NT) Jude"));
    assert!(report.contains("Looking at 2 books in both Bibles"));

    let json = serde_json::to_string(&first).unwrap();
    let back: BibleStats = serde_json::from_str(&json).unwrap();
    assert_eq!(back, first);
}
