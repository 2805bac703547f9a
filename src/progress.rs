//! Percentage progress reporting for long extractions.
//!
//! Every step is logged through `tracing` as `[ 42%] [starting]  message`.
//! When enabled, an `indicatif` bar mirrors the same counter on stderr.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Step counter for one extraction.
#[derive(Debug)]
pub struct ProgressIndicator {
    source: String,
    total: Option<usize>,
    bar: ProgressBar,
}

impl ProgressIndicator {
    /// Creates an indicator for `source`; `show_bar` draws an `indicatif` bar.
    #[must_use]
    pub fn new(source: impl Into<String>, show_bar: bool) -> Self {
        let bar = if show_bar {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template("{spinner} {prefix} [{bar:30}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        } else {
            ProgressBar::hidden()
        };
        let source = source.into();
        bar.set_prefix(source.clone());
        Self {
            source,
            total: None,
            bar,
        }
    }

    /// Indicator that only logs.
    #[must_use]
    pub fn silent(source: impl Into<String>) -> Self {
        Self::new(source, false)
    }

    /// Sets the number of steps; before this no percentage is shown.
    pub fn set_total(&mut self, total: usize) {
        self.total = Some(total);
        self.bar.set_length(as_position(total));
    }

    #[must_use]
    pub fn total(&self) -> Option<usize> {
        self.total
    }

    /// Reports that step `index` (zero-based) begins.
    pub fn starting(&self, index: usize, message: &str) {
        self.report(false, index, message);
        self.bar.set_position(as_position(index));
        self.bar.set_message(message.to_string());
    }

    /// Reports that step `index` (zero-based) is complete.
    pub fn finishing(&self, index: usize, message: &str) {
        self.report(true, index, message);
        self.bar.set_position(as_position(index.saturating_add(1)));
    }

    /// Free-form progress line without a step.
    pub fn note(&self, message: &str) {
        info!(source = %self.source, "{message}");
    }

    /// Clears the bar; logs a final line.
    pub fn finish(&self, message: &str) {
        self.bar.finish_and_clear();
        info!(source = %self.source, "{message}");
    }

    /// Renders the log line for one step.
    #[must_use]
    pub fn line(&self, done: bool, index: usize, message: &str) -> String {
        let percent = match self.total {
            Some(total) if total > 0 => format!("[{:3}%] ", index * 100 / total),
            _ => String::new(),
        };
        let state = if done { "[done] " } else { "[starting] " };
        format!("{percent}{state} {message}")
    }

    fn report(&self, done: bool, index: usize, message: &str) {
        info!(source = %self.source, "{}", self.line(done, index, message));
    }
}

fn as_position(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_without_total_has_no_percentage() {
        let progress = ProgressIndicator::silent("drbo");
        assert_eq!(progress.line(false, 3, "Extracting book Ruth"), "[starting]  Extracting book Ruth");
    }

    #[test]
    fn test_line_with_total() {
        let mut progress = ProgressIndicator::silent("drbo");
        progress.set_total(50);
        assert_eq!(progress.line(false, 21, "msg"), "[ 42%] [starting]  msg");
        assert_eq!(progress.line(true, 49, "msg"), "[ 98%] [done]  msg");
        assert_eq!(progress.total(), Some(50));
    }

    #[test]
    fn test_zero_total_does_not_divide() {
        let mut progress = ProgressIndicator::silent("x");
        progress.set_total(0);
        assert_eq!(progress.line(false, 0, "m"), "[starting]  m");
    }

    #[test]
    fn test_hidden_bar_accepts_updates() {
        let mut progress = ProgressIndicator::silent("x");
        progress.set_total(2);
        progress.starting(0, "a");
        progress.finishing(0, "a");
        progress.note("half way");
        progress.finish("done");
    }
}
