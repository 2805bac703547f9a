//! Post-extraction `Bible -> Bible` functions.
//!
//! Transforms run on one source after extraction and before merging, in
//! the order they were requested. [`apply_transforms`] never lets a failing
//! transform abort the batch: the failure is logged and recorded in the
//! [`TransformReport`], and the next transform sees the unchanged Bible.
//!
//! # Architecture
//!
//! - [`Transform`] - trait implemented by every function
//! - [`TransformRegistry`] - named lookup, built by [`build_default_transform_registry`]
//! - [`apply_transforms`] - continue-on-error application wrapper

mod check_lengths;
mod error;
mod fix_daniel;
mod remove;
mod remove_ranges;

pub use check_lengths::{MIN_VERSE_LEN, check_lengths};
pub use error::TransformError;
pub use fix_daniel::fix_daniel;
pub use remove::{remove_new, remove_old};
pub use remove_ranges::remove_ranges;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::bible::Bible;

/// A pure function from one Bible to another.
pub trait Transform: Send + Sync {
    /// Name used on the command line (e.g. `"remove_ranges"`).
    fn name(&self) -> &str;

    /// One-line description for listings.
    fn description(&self) -> &str;

    /// Produces the transformed Bible; `bible` itself is left untouched.
    ///
    /// # Errors
    ///
    /// Only for truly exceptional input; ordinary data issues are warnings.
    fn apply(&self, bible: &Bible) -> Result<Bible, TransformError>;
}

/// Adapter turning a plain function into a [`Transform`].
pub struct FnTransform {
    name: &'static str,
    description: &'static str,
    func: fn(&Bible) -> Result<Bible, TransformError>,
}

impl FnTransform {
    #[must_use]
    pub const fn new(
        name: &'static str,
        description: &'static str,
        func: fn(&Bible) -> Result<Bible, TransformError>,
    ) -> Self {
        Self {
            name,
            description,
            func,
        }
    }
}

impl Transform for FnTransform {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn apply(&self, bible: &Bible) -> Result<Bible, TransformError> {
        (self.func)(bible)
    }
}

impl std::fmt::Debug for FnTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTransform")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Name-addressable collection of transforms.
#[derive(Default)]
pub struct TransformRegistry {
    transforms: Vec<Arc<dyn Transform>>,
}

impl TransformRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, transform: Arc<dyn Transform>) {
        debug!(name = transform.name(), "Registering function");
        self.transforms.push(transform);
    }

    /// Finds a transform by name (case-insensitive).
    ///
    /// # Errors
    ///
    /// [`TransformError::Unknown`] if nothing matches.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn Transform>, TransformError> {
        self.transforms
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
            .cloned()
            .ok_or_else(|| TransformError::unknown(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Transform> {
        self.transforms.iter().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.transforms.iter().map(|t| t.name()).collect();
        f.debug_struct("TransformRegistry")
            .field("transforms", &names)
            .finish()
    }
}

/// Registry with every built-in transform.
#[must_use]
pub fn build_default_transform_registry() -> TransformRegistry {
    let mut registry = TransformRegistry::new();
    registry.register(Arc::new(FnTransform::new(
        "check_lengths",
        "log every verse shorter than 10 characters",
        check_lengths,
    )));
    registry.register(Arc::new(FnTransform::new(
        "remove_ranges",
        "drop verses covered by a verse-range warning",
        remove_ranges,
    )));
    registry.register(Arc::new(FnTransform::new(
        "remove_old",
        "drop the Old Testament",
        remove_old,
    )));
    registry.register(Arc::new(FnTransform::new(
        "remove_new",
        "drop the New Testament",
        remove_new,
    )));
    registry.register(Arc::new(FnTransform::new(
        "fix_daniel",
        "fold LXX Azarias, Susanna and Bel into Daniel",
        fix_daniel,
    )));
    registry
}

/// Result of one transform inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutcome {
    pub name: String,
    pub result: Result<(), TransformError>,
}

/// Per-transform outcomes of one [`apply_transforms`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    pub outcomes: Vec<TransformOutcome>,
}

impl TransformReport {
    pub fn failures(&self) -> impl Iterator<Item = (&str, &TransformError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Applies `transforms` in order, continuing past failures.
///
/// A failed or panicking transform leaves the Bible as it was before that
/// transform; later transforms still run.
#[tracing::instrument(skip(bible, transforms), fields(bible = bible.name(), count = transforms.len()))]
pub fn apply_transforms(
    bible: Bible,
    transforms: &[Arc<dyn Transform>],
) -> (Bible, TransformReport) {
    let mut current = bible;
    let mut report = TransformReport::default();

    for transform in transforms {
        let name = transform.name().to_string();
        let attempt = catch_unwind(AssertUnwindSafe(|| transform.apply(&current)))
            .unwrap_or_else(|_| Err(TransformError::Panicked {
                transform: name.clone(),
            }));
        match attempt {
            Ok(next) => {
                info!(function = %name, verses = next.len(), "Applied function");
                current = next;
                report.outcomes.push(TransformOutcome {
                    name,
                    result: Ok(()),
                });
            }
            Err(error) => {
                warn!(function = %name, error = %error, "Function failed; keeping bible unchanged");
                report.outcomes.push(TransformOutcome {
                    name,
                    result: Err(error),
                });
            }
        }
    }

    (current, report)
}
