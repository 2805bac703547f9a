//! Serializing Bibles for other tools.
//!
//! - [`json`] - the persisted layout, lossless and order-preserving
//! - [`sql`] - one `INSERT` statement per verse
//! - [`stats`] - book/verse counts and the comparison report between two stat files

mod error;
pub mod json;
pub mod sql;
pub mod stats;

pub use error::ExportError;
pub use json::{from_json_reader, from_json_str, to_json_string, to_json_writer};
pub use sql::{SqlTemplate, SqlValue, repr_quote};
pub use stats::{BibleStats, ChapterMismatch, MissingChapter, Side, StatsDiff, VersesPerChapter};
