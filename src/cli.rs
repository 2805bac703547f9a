//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Scrape, merge and export Bible text.
///
/// Each source is extracted (or loaded from a persisted `.json` Bible),
/// optionally post-processed by named functions, then all sources are merged
/// in command-line priority order and written as JSON or SQL.
#[derive(Parser, Debug)]
#[command(name = "bible-extractor")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the available sources and functions
    List,

    /// Extract, post-process and merge sources into one output file
    Extract(ExtractArgs),

    /// Print consistency diagnostics for a persisted Bible
    Check {
        /// Persisted JSON Bible
        file: PathBuf,
    },

    /// Write verse-count statistics for a persisted Bible
    Stats {
        /// Persisted JSON Bible
        file: PathBuf,

        /// Statistics file to write (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Sources as IDENT[:FN[,FN...]], highest priority first.
    /// IDENT is a source index, name, URL or a path to a .json Bible.
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// The output file [default: output.json]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format; defaults to the output file extension (.json, else sql)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// SQL table name [default: t_kjv]
    #[arg(long, value_name = "NAME")]
    pub table: Option<String>,

    /// Delay before every HTTP request in milliseconds (max 60000)
    #[arg(short = 'd', long, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub request_delay: Option<u64>,

    /// Overwrite the output file if it exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Sql,
}
