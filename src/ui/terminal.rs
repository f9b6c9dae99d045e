//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use super::{
    should_use_colors, KitupTheme, NonInteractiveUI, OutputMode, RunSummary, UserInterface,
};

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    theme: KitupTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            KitupTheme::new()
        } else {
            KitupTheme::plain()
        };

        Self {
            term: Term::stdout(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_progress() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        let mut stderr = Term::stderr();
        writeln!(stderr, "{}", self.theme.format_error(msg)).ok();
    }

    fn skipped(&mut self, msg: &str) {
        if self.mode.shows_progress() {
            writeln!(self.term, "{}", self.theme.format_skipped(msg)).ok();
        }
    }

    fn show_header(&mut self, title: &str) {
        writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
    }

    fn show_progress(&mut self, current: usize, total: usize, title: &str) {
        if self.mode.shows_progress() {
            writeln!(self.term, "{}", self.theme.format_step(current, total, title)).ok();
        }
    }

    fn show_tool(&mut self, name: &str, version: &str, found: bool) {
        writeln!(self.term, "{}", self.theme.format_tool(name, version, found)).ok();
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        writeln!(self.term).ok();
        for result in &summary.step_results {
            let line = format!("  {}", result.summary_line());
            let styled = if result.is_failure() {
                self.theme.error.apply_to(line)
            } else if result.is_skipped() {
                self.theme.dim.apply_to(line)
            } else {
                self.theme.success.apply_to(line)
            };
            writeln!(self.term, "{}", styled).ok();
        }
        writeln!(
            self.term,
            "  {}",
            self.theme.dim.apply_to(summary.footer())
        )
        .ok();
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_ui_output_mode() {
        let ui = TerminalUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn create_ui_non_interactive() {
        let ui = create_ui(false, OutputMode::Normal);
        assert!(!ui.is_interactive());
    }

    #[test]
    fn create_ui_respects_mode() {
        let ui = create_ui(false, OutputMode::Verbose);
        assert_eq!(ui.output_mode(), OutputMode::Verbose);
    }
}
