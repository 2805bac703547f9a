//! Command dispatch for the `bible-extractor` binary.

pub(crate) mod commands;
pub(crate) mod config;
pub(crate) mod pipeline;
pub(crate) mod settings;

use std::io::{self, IsTerminal};

use anyhow::Result;
use tracing::{debug, info};

use bible_extractor_core::{
    build_default_extractor_registry, build_default_transform_registry,
    configure_extractor_http_timeouts,
};

use crate::app::config::FileConfig;
use crate::cli::{Args, Command};

/// Runs the parsed command. Tracing is already installed.
pub(crate) async fn run(args: Args, file_config: Option<FileConfig>) -> Result<()> {
    let timeouts = settings::resolve_http_timeouts(file_config.as_ref());
    configure_extractor_http_timeouts(timeouts.connect_secs, timeouts.read_secs);
    debug!(
        connect_secs = timeouts.connect_secs,
        read_secs = timeouts.read_secs,
        "HTTP timeouts configured"
    );

    let transforms = build_default_transform_registry();
    match args.command {
        Command::List => {
            let extractors = build_default_extractor_registry();
            print!("{}", commands::render_listing(&extractors, &transforms));
        }
        Command::Extract(extract) => {
            let extractors = build_default_extractor_registry();
            let settings = settings::resolve_extract_settings(&extract, file_config.as_ref());
            let show_progress = !args.quiet && io::stderr().is_terminal();
            pipeline::run_extract(
                &extract.sources,
                &settings,
                &extractors,
                &transforms,
                show_progress,
            )
            .await?;
        }
        Command::Check { file } => {
            let problems = commands::check_file(&file)?;
            if problems.is_empty() {
                info!(file = %file.display(), "No errors in bible");
            }
            for problem in problems {
                println!("{problem}");
            }
        }
        Command::Stats { file, output } => {
            let stats = commands::stats_json(&file)?;
            commands::emit(&stats, output.as_deref())?;
        }
    }
    Ok(())
}
