//! Bible Extractor Core Library
//!
//! This library scrapes Bible text from several websites, normalizes it into
//! one in-memory model, merges independently scraped copies and exports the
//! result as JSON or SQL.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`bible`] - Data model: locations, verses, warnings and the `Bible` store
//! - [`merge`] - Priority-ordered merging of several Bibles
//! - [`transform`] - Named post-processing functions applied to a Bible
//! - [`export`] - Persisted JSON layout, SQL statements and statistics
//! - [`extractor`] - Site scrapers behind an async `Extractor` trait
//! - [`progress`] - Percentage progress lines for long extractions

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bible;
pub mod export;
pub mod extractor;
pub mod merge;
pub mod progress;
pub mod transform;
mod user_agent;

// Re-export commonly used types
pub use bible::{
    Bible, BibleError, Location, Testament, VerseAddress, Verse, Warning, canonicalize_book_name,
    category,
};
pub use export::{BibleStats, ExportError, SqlTemplate, SqlValue, StatsDiff};
pub use extractor::{
    ExtractContext, ExtractError, Extractor, ExtractorRegistry, build_default_extractor_registry,
    configure_extractor_http_timeouts,
};
pub use merge::{MergeError, merge};
pub use progress::ProgressIndicator;
pub use transform::{
    Transform, TransformError, TransformRegistry, TransformReport, apply_transforms,
    build_default_transform_registry,
};
