//! One `INSERT` statement per verse.
//!
//! # Trust boundary
//!
//! Table and column names are written verbatim and values are quoted with a
//! generic string-literal escaping, not a database driver. The output is
//! meant for loading trusted, locally produced Bibles into a scratch table;
//! never build a [`SqlTemplate`] from untrusted input.

use std::fmt::Write as _;
use std::io::Write;

use crate::bible::{Bible, Verse};

/// What goes into one column of the generated statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// Book name, quoted
    Book,
    /// Chapter number, bare
    Chapter,
    /// Verse number, bare
    Verse,
    /// Verse text, quoted
    Text,
    /// Fixed string, quoted
    Literal(String),
}

/// Table name plus ordered `(column, value)` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlTemplate {
    table: String,
    columns: Vec<(String, SqlValue)>,
}

impl Default for SqlTemplate {
    /// `t_kjv (b, c, v, t)`.
    fn default() -> Self {
        Self::new("t_kjv")
            .column("b", SqlValue::Book)
            .column("c", SqlValue::Chapter)
            .column("v", SqlValue::Verse)
            .column("t", SqlValue::Text)
    }
}

impl SqlTemplate {
    /// Template with no columns.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
        }
    }

    /// Default columns against another table name.
    #[must_use]
    pub fn with_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn column(mut self, name: impl Into<String>, value: SqlValue) -> Self {
        self.columns.push((name.into(), value));
        self
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Statement for one verse, without trailing newline.
    #[must_use]
    pub fn statement(&self, verse: &Verse) -> String {
        let columns: Vec<&str> = self.columns.iter().map(|(name, _)| name.as_str()).collect();
        let values: Vec<String> = self
            .columns
            .iter()
            .map(|(_, value)| match value {
                SqlValue::Book => repr_quote(verse.location().book()),
                SqlValue::Chapter => verse.location().chapter().to_string(),
                SqlValue::Verse => verse.location().verse().to_string(),
                SqlValue::Text => repr_quote(verse.text()),
                SqlValue::Literal(literal) => repr_quote(literal),
            })
            .collect();
        format!(
            "INSERT INTO {} ({})\nVALUES  ({});",
            self.table,
            columns.join(", "),
            values.join(", ")
        )
    }

    /// All statements in canonical verse order, newline separated.
    #[must_use]
    pub fn render(&self, bible: &Bible) -> String {
        bible
            .iter(None)
            .map(|verse| self.statement(&verse))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Streams [`SqlTemplate::render`] output into `writer`.
    ///
    /// # Errors
    ///
    /// Any write error from `writer`.
    pub fn write_to<W: Write>(&self, bible: &Bible, mut writer: W) -> std::io::Result<()> {
        for (index, verse) in bible.iter(None).enumerate() {
            if index > 0 {
                writer.write_all(b"\n")?;
            }
            writer.write_all(self.statement(&verse).as_bytes())?;
        }
        writer.flush()
    }
}

/// Quotes `value` as a single-line string literal.
///
/// Single quotes are used unless the value contains a single quote and no
/// double quote. Backslashes, the chosen quote and control characters are
/// escaped.
#[must_use]
pub fn repr_quote(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if u32::from(c) < 0x20 || u32::from(c) == 0x7f => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
