//! End-to-end CLI tests for the bible-extractor binaries.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use bible_extractor_core::export::{from_json_str, to_json_string};
use bible_extractor_core::{Bible, Location, Testament};
use predicates::prelude::*;
use tempfile::TempDir;

fn extractor_cmd(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bible-extractor").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home).env_remove("RUST_LOG");
    cmd
}

fn write_extractor_config(config_home: &Path, contents: &str) {
    let config_dir = config_home.join("bible-extractor");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), contents).unwrap();
}

fn save(dir: &Path, file: &str, bible: &Bible) -> PathBuf {
    let path = dir.join(file);
    std::fs::write(&path, to_json_string(bible).unwrap()).unwrap();
    path
}

fn primary() -> Bible {
    let mut bible = Bible::new("primary");
    let genesis = |verse| Location::with_testament("Genesis", 1, verse, Testament::Old);
    bible.set(&genesis(1), "In the beginning God created the heaven and the earth.").unwrap();
    bible.set(&genesis(3), "And God said, Let there be light.").unwrap();
    bible
        .set(
            &Location::with_testament("Jude", 1, 1, Testament::New),
            "Jude, the servant of Jesus Christ.",
        )
        .unwrap();
    bible
}

fn secondary() -> Bible {
    let mut bible = Bible::new("secondary");
    bible
        .set(
            &Location::with_testament("Genesis", 1, 2, Testament::Old),
            "And the earth was without form, and void.",
        )
        .unwrap();
    bible
}

#[test]
fn test_binary_list_shows_sources_and_functions() {
    let home = TempDir::new().unwrap();
    extractor_cmd(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sources"))
        .stdout(predicate::str::contains("http://www.drbo.org/"))
        .stdout(predicate::str::contains("jesus"))
        .stdout(predicate::str::contains("fix_daniel"));
}

#[test]
fn test_binary_extract_merges_json_sources() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let first = save(work.path(), "primary.json", &primary());
    let second = save(work.path(), "secondary.json", &secondary());
    let output = work.path().join("merged.json");

    extractor_cmd(home.path())
        .arg("extract")
        .arg(format!("{}:remove_new", first.display()))
        .arg(&second)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let merged = from_json_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(merged.name(), "primary and secondary");
    assert_eq!(merged.len(), 3);
    assert!(!merged.contains(&Location::new("Jude", 1, 1)));
    assert_eq!(
        merged.text(&Location::new("Genesis", 1, 2)),
        Some("And the earth was without form, and void.")
    );
}

#[test]
fn test_binary_extract_writes_sql_by_extension() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let source = save(work.path(), "primary.json", &primary());
    let output = work.path().join("bible.sql");

    extractor_cmd(home.path())
        .args(["extract", "--table", "t_test", "-o"])
        .arg(&output)
        .arg(&source)
        .assert()
        .success();

    let sql = std::fs::read_to_string(&output).unwrap();
    assert!(sql.starts_with("INSERT INTO t_test (b, c, v, t)\nVALUES  ('Genesis', 1, 1, "));
    assert_eq!(sql.matches("INSERT INTO").count(), 3);
}

#[test]
fn test_binary_extract_uses_config_table() {
    let home = TempDir::new().unwrap();
    write_extractor_config(home.path(), "sql_table = \"t_from_config\" # default table\n");
    let work = TempDir::new().unwrap();
    let source = save(work.path(), "primary.json", &primary());
    let output = work.path().join("bible.sql");

    extractor_cmd(home.path())
        .arg("extract")
        .arg(&source)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let sql = std::fs::read_to_string(&output).unwrap();
    assert!(sql.starts_with("INSERT INTO t_from_config "));
}

#[test]
fn test_binary_extract_refuses_to_overwrite_without_force() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let source = save(work.path(), "primary.json", &primary());
    let output = work.path().join("out.json");
    std::fs::write(&output, "precious").unwrap();

    extractor_cmd(home.path())
        .arg("extract")
        .arg(&source)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "precious");

    extractor_cmd(home.path())
        .arg("extract")
        .arg(&source)
        .arg("-o")
        .arg(&output)
        .arg("--force")
        .assert()
        .success();
    assert!(from_json_str(&std::fs::read_to_string(&output).unwrap()).is_ok());
}

#[test]
fn test_binary_unknown_source_fails() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let output = work.path().join("out.json");

    extractor_cmd(home.path())
        .args(["extract", "nowhere", "-o"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown source 'nowhere'"));
    assert!(!output.exists());
}

#[test]
fn test_binary_unknown_function_fails() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let source = save(work.path(), "primary.json", &primary());

    extractor_cmd(home.path())
        .arg("extract")
        .arg(format!("{}:shuffle", source.display()))
        .arg("-o")
        .arg(work.path().join("out.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown function 'shuffle'"));
}

#[test]
fn test_binary_invalid_config_fails() {
    let home = TempDir::new().unwrap();
    write_extractor_config(home.path(), "concurrency = 4\n");

    extractor_cmd(home.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config.toml"));
}

#[test]
fn test_binary_check_prints_diagnostics() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let source = save(work.path(), "primary.json", &primary());

    extractor_cmd(home.path())
        .arg("check")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Inconsistent verse number in chapter 1 in book Genesis",
        ));
}

#[test]
fn test_binary_stats_and_diff() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let first = save(work.path(), "primary.json", &primary());
    let second = save(work.path(), "secondary.json", &secondary());
    let first_stats = work.path().join("primary.stats.json");
    let second_stats = work.path().join("secondary.stats.json");

    for (bible, stats) in [(&first, &first_stats), (&second, &second_stats)] {
        extractor_cmd(home.path())
            .arg("stats")
            .arg(bible)
            .arg("-o")
            .arg(stats)
            .assert()
            .success();
    }

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&first_stats).unwrap()).unwrap();
    assert_eq!(value["num_books"], serde_json::json!([1, 1]));
    assert_eq!(value["num_verses_per_chapter"]["old"]["Genesis"]["1"], 2);

    Command::cargo_bin("bible-stats-diff")
        .unwrap()
        .arg(&first_stats)
        .arg(&second_stats)
        .args(["--name1", "primary", "--name2", "secondary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("primary has 1 books not in secondary:"))
        .stdout(predicate::str::contains("\t- (NT) Jude"))
        .stdout(predicate::str::contains(
            "primary has   2 verse(s) but secondary has   1 verse(s)",
        ));
}

#[test]
fn test_binary_stats_diff_rejects_non_stats_file() {
    let work = TempDir::new().unwrap();
    let bogus = work.path().join("bogus.json");
    std::fs::write(&bogus, "[1, 2, 3]").unwrap();

    Command::cargo_bin("bible-stats-diff")
        .unwrap()
        .arg(&bogus)
        .arg(&bogus)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a statistics file"));
}
