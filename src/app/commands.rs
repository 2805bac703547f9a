//! The `list`, `check` and `stats` subcommands.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use bible_extractor_core::{BibleStats, ExtractorRegistry, TransformRegistry};

use crate::app::pipeline::load_bible;

/// Source and function listing printed by `list`.
#[must_use]
pub(crate) fn render_listing(extractors: &ExtractorRegistry, transforms: &TransformRegistry) -> String {
    let mut out = String::from("Sources\n");
    for (index, extractor) in extractors.iter().enumerate() {
        let _ = writeln!(
            out,
            "{index:>4}    {:<10} {:<42} {}",
            extractor.name(),
            extractor.url(),
            extractor.bible_name()
        );
    }
    out.push_str("\nFunctions\n");
    for transform in transforms.iter() {
        let _ = writeln!(out, "    {:<14} {}", transform.name(), transform.description());
    }
    out
}

/// Consistency diagnostics of the Bible stored at `path`.
pub(crate) fn check_file(path: &Path) -> Result<Vec<String>> {
    let bible = load_bible(path)?;
    let problems = bible.check();
    info!(
        bible = bible.name(),
        verses = bible.len(),
        problems = problems.len(),
        "Checked bible"
    );
    Ok(problems)
}

/// Pretty JSON statistics for the Bible stored at `path`.
pub(crate) fn stats_json(path: &Path) -> Result<String> {
    let bible = load_bible(path)?;
    let stats = BibleStats::from_bible(&bible);
    serde_json::to_string_pretty(&stats).context("Failed to serialize statistics")
}

/// Writes `contents` to `output`, or stdout when absent.
pub(crate) fn emit(contents: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("Failed to write '{}'", path.display())),
        None => {
            println!("{contents}");
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bible_extractor_core::export::to_json_string;
    use bible_extractor_core::{
        Bible, Location, Testament, build_default_transform_registry,
    };
    use tempfile::TempDir;

    fn saved_bible(dir: &TempDir) -> std::path::PathBuf {
        let mut bible = Bible::new("sample");
        bible
            .set(&Location::with_testament("Genesis", 1, 1, Testament::Old), "In the beginning")
            .unwrap();
        bible
            .set(&Location::with_testament("Genesis", 1, 3, Testament::Old), "Let there be light")
            .unwrap();
        bible
            .set(&Location::with_testament("Jude", 1, 1, Testament::New), "Jude, the servant")
            .unwrap();
        let path = dir.path().join("sample.json");
        std::fs::write(&path, to_json_string(&bible).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_listing_names_functions() {
        let listing = render_listing(&ExtractorRegistry::new(), &build_default_transform_registry());
        assert!(listing.starts_with("Sources\n"));
        for name in ["check_lengths", "remove_ranges", "remove_old", "remove_new", "fix_daniel"] {
            assert!(listing.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_check_file_reports_gap() {
        let dir = TempDir::new().unwrap();
        let problems = check_file(&saved_bible(&dir)).unwrap();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("Genesis"));
    }

    #[test]
    fn test_stats_json_counts() {
        let dir = TempDir::new().unwrap();
        let stats: BibleStats = serde_json::from_str(&stats_json(&saved_bible(&dir)).unwrap()).unwrap();
        assert_eq!(stats.num_books, [1, 1]);
        assert_eq!(stats.num_verses_per_chapter.old["Genesis"][&1], 2);
        assert_eq!(stats.num_warnings, 0);
    }

    #[test]
    fn test_missing_file_has_path_in_error() {
        let err = check_file(Path::new("/nonexistent/bible.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bible.json"));
    }

    #[test]
    fn test_emit_to_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("stats.json");
        emit("{}", Some(&out)).unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "{}");
    }
}
