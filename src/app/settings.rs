//! Merges command-line values over file config into the settings of one run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bible_extractor_core::SqlTemplate;

use crate::app::config::FileConfig;
use crate::cli::{Args, ExtractArgs, OutputFormat};

const DEFAULT_OUTPUT: &str = "output.json";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Log filter used when `RUST_LOG` is unset.
///
/// Priority: quiet flag > verbose flag > config verbosity > `info`.
#[must_use]
pub(crate) fn default_log_level(args: &Args, file_config: Option<&FileConfig>) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => file_config
            .and_then(|cfg| cfg.verbosity)
            .map_or("info", |verbosity| verbosity.log_level()),
        1 => "debug",
        _ => "trace",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HttpTimeoutSettings {
    pub(crate) connect_secs: u64,
    pub(crate) read_secs: u64,
}

pub(crate) fn resolve_http_timeouts(file_config: Option<&FileConfig>) -> HttpTimeoutSettings {
    HttpTimeoutSettings {
        connect_secs: file_config
            .and_then(|cfg| cfg.connect_timeout_secs)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        read_secs: file_config
            .and_then(|cfg| cfg.read_timeout_secs)
            .unwrap_or(DEFAULT_READ_TIMEOUT_SECS),
    }
}

/// Everything `extract` needs besides the source list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtractSettings {
    pub(crate) output: PathBuf,
    pub(crate) format: OutputFormat,
    pub(crate) sql: SqlTemplate,
    pub(crate) request_delay: Duration,
    pub(crate) force: bool,
}

pub(crate) fn resolve_extract_settings(
    args: &ExtractArgs,
    file_config: Option<&FileConfig>,
) -> ExtractSettings {
    let output = args
        .output
        .clone()
        .or_else(|| file_config.and_then(|cfg| cfg.output.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let format = args
        .format
        .or_else(|| file_config.and_then(|cfg| cfg.format))
        .unwrap_or_else(|| format_for_path(&output));
    let sql = args
        .table
        .clone()
        .or_else(|| file_config.and_then(|cfg| cfg.sql_table.clone()))
        .map_or_else(SqlTemplate::default, SqlTemplate::with_table);
    let request_delay_ms = args
        .request_delay
        .or_else(|| file_config.and_then(|cfg| cfg.request_delay_ms))
        .unwrap_or(0);

    ExtractSettings {
        output,
        format,
        sql,
        request_delay: Duration::from_millis(request_delay_ms),
        force: args.force,
    }
}

/// `.json` files get JSON, everything else SQL.
#[must_use]
pub(crate) fn format_for_path(path: &Path) -> OutputFormat {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        OutputFormat::Json
    } else {
        OutputFormat::Sql
    }
}
