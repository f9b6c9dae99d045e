//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use kitup::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Probing zsh");
//! ui.success("Provisioning complete");
//!
//! assert!(ui.has_message("Probing"));
//! assert!(ui.successes().contains(&"Provisioning complete".to_string()));
//! ```

use super::{OutputMode, RunSummary, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    skips: Vec<String>,
    headers: Vec<String>,
    progress: Vec<(usize, usize, String)>,
    tools: Vec<(String, String, bool)>,
    summaries: Vec<RunSummary>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            ..Default::default()
        }
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured skip lines.
    pub fn skips(&self) -> &[String] {
        &self.skips
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all progress lines as `(current, total, title)`.
    pub fn progress(&self) -> &[(usize, usize, String)] {
        &self.progress
    }

    /// Get all verification rows as `(name, version, found)`.
    pub fn tools(&self) -> &[(String, String, bool)] {
        &self.tools
    }

    /// Get all run summaries.
    pub fn summaries(&self) -> &[RunSummary] {
        &self.summaries
    }

    /// Check if any message contains `msg`.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if any success message contains `msg`.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if any warning contains `msg`.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if any error contains `msg`.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn skipped(&mut self, msg: &str) {
        self.skips.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_progress(&mut self, current: usize, total: usize, title: &str) {
        self.progress.push((current, total, title.to_string()));
    }

    fn show_tool(&mut self, name: &str, version: &str, found: bool) {
        self.tools
            .push((name.to_string(), version.to_string(), found));
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        self.summaries.push(summary.clone());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
