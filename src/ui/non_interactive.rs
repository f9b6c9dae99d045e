//! Non-interactive UI for CI/headless environments.
//!
//! Plain text, no colour, every line prefixed with a status tag so logs can
//! be grepped.

use super::{OutputMode, RunSummary, UserInterface};

/// UI implementation for non-interactive mode.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_progress() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        println!("[ok] {}", msg);
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("[warn] {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("[error] {}", msg);
    }

    fn skipped(&mut self, msg: &str) {
        if self.mode.shows_progress() {
            println!("[skip] {}", msg);
        }
    }

    fn show_header(&mut self, title: &str) {
        println!("\n{}\n", title);
    }

    fn show_progress(&mut self, current: usize, total: usize, title: &str) {
        if self.mode.shows_progress() {
            println!("[{}/{}] {}", current, total, title);
        }
    }

    fn show_tool(&mut self, name: &str, version: &str, _found: bool) {
        println!("  {:<8} {}", name, version);
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        println!();
        for result in &summary.step_results {
            println!("  {}", result.summary_line());
        }
        println!("  {}", summary.footer());
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
