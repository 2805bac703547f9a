//! The `extract` pipeline: resolve sources, extract them concurrently, run
//! each source's functions, merge in priority order and write the result.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use anyhow::{Context, Result, bail};
use futures_util::future::try_join_all;
use regex::Regex;
use tracing::{info, warn};

use bible_extractor_core::export::from_json_reader;
use bible_extractor_core::extractor::html::compile_static_regex;
use bible_extractor_core::{
    Bible, ExtractContext, Extractor, ExtractorRegistry, Transform, TransformRegistry,
    apply_transforms, merge,
};

use crate::app::settings::ExtractSettings;
use crate::cli::OutputFormat;

static FUNCTION_LIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"^[A-Za-z_][A-Za-z0-9_]*(?:,[A-Za-z_][A-Za-z0-9_]*)*$")
});

/// One `IDENT[:FN[,FN...]]` command-line source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceSpec {
    pub(crate) identifier: String,
    pub(crate) functions: Vec<String>,
}

impl SourceSpec {
    /// Splits off a trailing function list.
    ///
    /// Only a suffix that looks like `name[,name...]` counts, so URL
    /// identifiers such as `http://www.drbo.org/` stay whole.
    pub(crate) fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let (identifier, functions) = match raw.rsplit_once(':') {
            Some((ident, "")) => (ident, Vec::new()),
            Some((ident, list)) if FUNCTION_LIST_RE.is_match(list) => {
                (ident, list.split(',').map(str::to_string).collect())
            }
            _ => (raw, Vec::new()),
        };
        if identifier.is_empty() {
            bail!("Empty source in '{raw}'\n  Suggestion: Use IDENT[:FN[,FN...]], e.g. drbo:remove_new");
        }
        Ok(Self {
            identifier: identifier.to_string(),
            functions,
        })
    }
}

/// Where a source's Bible comes from.
enum SourceKind<'r> {
    Site(&'r dyn Extractor),
    Persisted(PathBuf),
}

struct ResolvedSource<'r> {
    spec: SourceSpec,
    kind: SourceKind<'r>,
    functions: Vec<Arc<dyn Transform>>,
}

impl ResolvedSource<'_> {
    fn label(&self) -> &str {
        &self.spec.identifier
    }
}

fn is_persisted_bible(identifier: &str) -> bool {
    let path = Path::new(identifier);
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        || path.is_file()
}

fn resolve_sources<'r>(
    specs: Vec<SourceSpec>,
    extractors: &'r ExtractorRegistry,
    transforms: &TransformRegistry,
) -> Result<Vec<ResolvedSource<'r>>> {
    specs
        .into_iter()
        .map(|spec| -> Result<ResolvedSource<'r>> {
            let kind = if is_persisted_bible(&spec.identifier) {
                SourceKind::Persisted(PathBuf::from(&spec.identifier))
            } else {
                SourceKind::Site(extractors.lookup(&spec.identifier)?)
            };
            let functions = spec
                .functions
                .iter()
                .map(|name| transforms.lookup(name))
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("Invalid functions for source '{}'", spec.identifier))?;
            Ok(ResolvedSource {
                spec,
                kind,
                functions,
            })
        })
        .collect()
}

/// Reads a persisted JSON Bible.
pub(crate) fn load_bible(path: &Path) -> Result<Bible> {
    let file =
        File::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?;
    from_json_reader(BufReader::new(file))
        .with_context(|| format!("Failed to load Bible from '{}'", path.display()))
}

async fn fetch(source: &ResolvedSource<'_>, ctx: &ExtractContext) -> Result<Bible> {
    match &source.kind {
        SourceKind::Site(extractor) => {
            info!(source = extractor.name(), url = extractor.url(), "Extracting");
            extractor
                .extract(ctx)
                .await
                .with_context(|| format!("Extraction from '{}' failed", extractor.name()))
        }
        SourceKind::Persisted(path) => {
            info!(path = %path.display(), "Loading persisted bible");
            load_bible(path)
        }
    }
}

/// Runs `extract` end to end and returns the written Bible.
#[tracing::instrument(skip_all, fields(sources = raw_sources.len(), output = %settings.output.display()))]
pub(crate) async fn run_extract(
    raw_sources: &[String],
    settings: &ExtractSettings,
    extractors: &ExtractorRegistry,
    transforms: &TransformRegistry,
    show_progress: bool,
) -> Result<Bible> {
    if settings.output.exists() && !settings.force {
        bail!(
            "The file '{}' exists\n  Suggestion: Pass --force to overwrite it or choose another -o",
            settings.output.display()
        );
    }

    let specs = raw_sources
        .iter()
        .map(|raw| SourceSpec::parse(raw))
        .collect::<Result<Vec<_>>>()?;
    let sources = resolve_sources(specs, extractors, transforms)?;

    let ctx = ExtractContext::new(settings.request_delay, show_progress);
    let extracted = try_join_all(sources.iter().map(|source| fetch(source, &ctx))).await?;

    let mut processed = Vec::with_capacity(extracted.len());
    for (source, bible) in sources.iter().zip(extracted) {
        let (bible, report) = apply_transforms(bible, &source.functions);
        for (function, error) in report.failures() {
            warn!(source = source.label(), function, error = %error, "Function failed");
        }
        if !source.functions.is_empty() {
            info!(
                source = source.label(),
                applied = source.functions.len() - report.failed_count(),
                failed = report.failed_count(),
                "Functions finished"
            );
        }
        processed.push(bible);
    }

    let merged = merge(&processed)?;
    for problem in merged.check() {
        warn!(problem = %problem, "Consistency check");
    }

    write_bible(&merged, settings)?;
    info!(
        verses = merged.len(),
        warnings = merged.warnings().len(),
        output = %settings.output.display(),
        "Bible written"
    );
    Ok(merged)
}

fn write_bible(bible: &Bible, settings: &ExtractSettings) -> Result<()> {
    let path = &settings.output;
    let file =
        File::create(path).with_context(|| format!("Failed to create '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    match settings.format {
        OutputFormat::Json => bible_extractor_core::export::to_json_writer(bible, &mut writer)
            .with_context(|| format!("Failed to write JSON to '{}'", path.display()))?,
        OutputFormat::Sql => settings
            .sql
            .write_to(bible, &mut writer)
            .with_context(|| format!("Failed to write SQL to '{}'", path.display()))?,
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write '{}'", path.display()))
}
