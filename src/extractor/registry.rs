//! Lookup of extractors by URL, short name or registration index.

use tracing::debug;

use super::{ExtractError, Extractor};

/// Ordered collection of extractors.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn Extractor>>,
}

impl ExtractorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Registers an extractor; registration order is listing order.
    #[tracing::instrument(skip(self, extractor), fields(extractor_name))]
    pub fn register(&mut self, extractor: Box<dyn Extractor>) {
        tracing::Span::current().record("extractor_name", extractor.name());
        debug!(name = extractor.name(), url = extractor.url(), "Registering extractor");
        self.extractors.push(extractor);
    }

    /// Finds an extractor.
    ///
    /// `identifier` may be an extractor URL (trailing slash and case are
    /// ignored), a short name (case-insensitive) or a zero-based index.
    ///
    /// # Errors
    ///
    /// [`ExtractError::UnknownSource`] if nothing matches.
    #[tracing::instrument(skip(self))]
    pub fn lookup(&self, identifier: &str) -> Result<&dyn Extractor, ExtractError> {
        let wanted = identifier.trim();
        let by_url = self
            .extractors
            .iter()
            .find(|e| same_url(e.url(), wanted));
        let by_name = || {
            self.extractors
                .iter()
                .find(|e| e.name().eq_ignore_ascii_case(wanted))
        };
        let by_index = || {
            wanted
                .parse::<usize>()
                .ok()
                .and_then(|index| self.extractors.get(index))
        };
        by_url
            .or_else(by_name)
            .or_else(by_index)
            .map(AsRef::as_ref)
            .ok_or_else(|| ExtractError::unknown_source(identifier))
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Extractor> {
        self.extractors.iter().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

fn same_url(registered: &str, wanted: &str) -> bool {
    registered
        .trim_end_matches('/')
        .eq_ignore_ascii_case(wanted.trim_end_matches('/'))
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.extractors.iter().map(|e| e.name()).collect();
        f.debug_struct("ExtractorRegistry")
            .field("extractor_count", &self.extractors.len())
            .field("extractors", &names)
            .finish()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
