//! User-facing console output.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for capturing output in tests
//!
//! Diagnostics go through `tracing`; this layer is only for what the user
//! is meant to read.
//!
//! # Example
//!
//! ```
//! use kitup::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("kitup");
//! ui.success("Provisioning complete");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::{live_output_callback, OutputMode};
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, KitupTheme};

use std::time::Duration;

use crate::steps::StepResult;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Shown in every output mode.
    fn error(&mut self, msg: &str);

    /// Display a skipped step.
    fn skipped(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show a step about to run (e.g., "[2/5] Node via nvm").
    fn show_progress(&mut self, current: usize, total: usize, title: &str);

    /// Show one verification row.
    fn show_tool(&mut self, name: &str, version: &str, found: bool);

    /// Show the end-of-run summary.
    fn show_run_summary(&mut self, summary: &RunSummary);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Step outcomes for the end-of-run summary.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Results in plan order.
    pub step_results: Vec<StepResult>,
    /// Total run duration.
    pub total_duration: Duration,
}

impl RunSummary {
    /// Number of steps whose script ran.
    pub fn steps_run(&self) -> usize {
        self.step_results.iter().filter(|r| !r.is_skipped()).count()
    }

    /// Number of steps skipped as already configured.
    pub fn steps_skipped(&self) -> usize {
        self.step_results.iter().filter(|r| r.is_skipped()).count()
    }

    /// Footer line: totals and duration.
    pub fn footer(&self) -> String {
        format!(
            "Total: {} · {} run · {} skipped",
            crate::steps::format_duration(self.total_duration),
            self.steps_run(),
            self.steps_skipped()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_summary_counts() {
        let summary = RunSummary {
            step_results: vec![
                StepResult::skipped("zsh", "ok"),
                StepResult::succeeded("nvm", Duration::from_secs(3)),
                StepResult::skipped("tmux", "ok"),
            ],
            total_duration: Duration::from_secs(3),
        };
        assert_eq!(summary.steps_run(), 1);
        assert_eq!(summary.steps_skipped(), 2);
        assert_eq!(summary.footer(), "Total: 3.0s · 1 run · 2 skipped");
    }

    #[test]
    fn empty_summary() {
        let summary = RunSummary::default();
        assert_eq!(summary.steps_run(), 0);
        assert!(summary.footer().contains("0ms"));
    }
}
