//! Compares two statistics files written by `bible-extractor stats`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use bible_extractor_core::{BibleStats, StatsDiff};

/// Compare two bible stat JSON files.
#[derive(Parser, Debug)]
#[command(name = "bible-stats-diff")]
#[command(author, version, about)]
struct Args {
    /// First statistics file
    stat1: PathBuf,

    /// Second statistics file
    stat2: PathBuf,

    /// Name used for the first file in the report
    #[arg(long, default_value = "stat1")]
    name1: String,

    /// Name used for the second file in the report
    #[arg(long, default_value = "stat2")]
    name2: String,
}

fn read_stats(path: &Path) -> Result<BibleStats> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("'{}' is not a statistics file", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let first = read_stats(&args.stat1)?;
    let second = read_stats(&args.stat2)?;
    let diff = StatsDiff::compare(&first, &second).with_names(args.name1, args.name2);
    print!("{diff}");
    Ok(())
}
