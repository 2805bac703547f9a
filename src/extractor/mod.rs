//! Site extractors producing [`Bible`] values from scripture websites.
//!
//! Each extractor knows one site's layout. Anomalies found while scraping
//! (unparseable numbers, verse ranges, empty paragraphs) are recorded as
//! warnings on the returned Bible; only transport failures and missing page
//! skeletons abort an extraction.
//!
//! # Architecture
//!
//! - [`Extractor`] - async trait implemented by every site
//! - [`ExtractorRegistry`] - lookup by URL, short name or index
//! - [`ExtractContext`] - per-run options (politeness delay, progress bar)
//! - [`DrboExtractor`], [`BibleHubExtractor`], [`EbibleExtractor`], [`JesusIsLordExtractor`]
//!
//! # Example
//!
//! ```no_run
//! use bible_extractor_core::extractor::{ExtractContext, build_default_extractor_registry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = build_default_extractor_registry();
//! let extractor = registry.lookup("drbo")?;
//! let bible = extractor.extract(&ExtractContext::default()).await?;
//! println!("{} verses", bible.len());
//! # Ok(())
//! # }
//! ```

mod biblehub;
mod drbo;
mod ebible;
mod error;
pub mod html;
mod http_client;
mod jesus;
mod registry;

pub use biblehub::BibleHubExtractor;
pub use drbo::DrboExtractor;
pub use ebible::EbibleExtractor;
pub use error::ExtractError;
pub use http_client::{PageFetcher, configure_extractor_http_timeouts};
pub use jesus::JesusIsLordExtractor;
pub use registry::ExtractorRegistry;

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::bible::{Bible, Location};
use crate::progress::ProgressIndicator;

/// Builds the registry used by the CLI, in listing order.
///
/// An extractor whose HTTP client cannot be built is skipped with a warning.
#[must_use]
pub fn build_default_extractor_registry() -> ExtractorRegistry {
    let mut registry = ExtractorRegistry::new();

    match DrboExtractor::new() {
        Ok(extractor) => registry.register(Box::new(extractor)),
        Err(error) => warn!(error = %error, "drbo extractor unavailable"),
    }
    match BibleHubExtractor::new() {
        Ok(extractor) => registry.register(Box::new(extractor)),
        Err(error) => warn!(error = %error, "biblehub extractor unavailable"),
    }
    match EbibleExtractor::new() {
        Ok(extractor) => registry.register(Box::new(extractor)),
        Err(error) => warn!(error = %error, "ebible extractor unavailable"),
    }
    match JesusIsLordExtractor::new() {
        Ok(extractor) => registry.register(Box::new(extractor)),
        Err(error) => warn!(error = %error, "jesus extractor unavailable"),
    }
    registry
}

/// Options shared by every extraction of one run.
#[derive(Debug, Clone, Default)]
pub struct ExtractContext {
    /// Pause before each request.
    pub request_delay: Duration,
    /// Draw an `indicatif` bar in addition to the log lines.
    pub show_progress: bool,
}

impl ExtractContext {
    #[must_use]
    pub fn new(request_delay: Duration, show_progress: bool) -> Self {
        Self {
            request_delay,
            show_progress,
        }
    }

    /// Progress indicator for one source.
    #[must_use]
    pub fn progress(&self, source: &str) -> ProgressIndicator {
        ProgressIndicator::new(source, self.show_progress)
    }
}

/// A scraper for one website.
///
/// Uses `async_trait` so extractors can live in the registry as
/// `Box<dyn Extractor>`.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Short name used on the command line (e.g. `"drbo"`).
    fn name(&self) -> &str;

    /// Canonical URL identifying the source.
    fn url(&self) -> &str;

    /// Name given to extracted Bibles.
    fn bible_name(&self) -> &str;

    /// Scrapes the whole site.
    async fn extract(&self, ctx: &ExtractContext) -> Result<Bible, ExtractError>;
}

/// Stores a verse, mapping storage errors to [`ExtractError::Bible`].
pub(crate) fn store(
    bible: &mut Bible,
    source: &str,
    location: &Location,
    text: impl Into<String>,
) -> Result<(), ExtractError> {
    bible
        .set(location, text)
        .map_err(|error| ExtractError::bible(source, error))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_order() {
        let registry = build_default_extractor_registry();
        let names: Vec<&str> = registry.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["drbo", "biblehub", "ebible", "jesus"]);
    }

    #[test]
    fn test_context_defaults() {
        let ctx = ExtractContext::default();
        assert!(ctx.request_delay.is_zero());
        assert!(!ctx.show_progress);
        assert_eq!(ctx.progress("drbo").total(), None);
    }
}
