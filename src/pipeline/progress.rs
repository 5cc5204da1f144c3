//! Progress reporting for the aggregation run
//!
//! The engine reports (percentage, status) pairs through a sink trait so
//! callers can surface progress however they like. A console
//! implementation backed by indicatif is provided, plus a no-op sink for
//! headless runs.

use indicatif::{ProgressBar, ProgressStyle};

/// Template for the console progress bar
pub const DEFAULT_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

/// Receiver of progress updates
///
/// `percentage` runs 0-100; updates arrive at the start of the row pass,
/// roughly every 1% of rows, and at completion.
pub trait ProgressSink {
    fn emit(&mut self, percentage: u8, status: &str);
}

/// Sink that discards every update
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn emit(&mut self, _percentage: u8, _status: &str) {}
}

/// Console progress bar sink
#[derive(Debug)]
pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    /// Create a progress bar spanning 0-100 percent
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(DEFAULT_BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self { bar }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleProgress {
    fn emit(&mut self, percentage: u8, status: &str) {
        self.bar.set_position(u64::from(percentage.min(100)));
        self.bar.set_message(status.to_string());
        if percentage >= 100 {
            self.bar.finish_with_message(status.to_string());
        }
    }
}

/// Sink that records every update, used by the tests
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub updates: Vec<(u8, String)>,
}

impl ProgressSink for RecordingProgress {
    fn emit(&mut self, percentage: u8, status: &str) {
        self.updates.push((percentage, status.to_string()));
    }
}
