//! Output mode and live script output.

use crate::shell::{OutputCallback, OutputLine};

use super::theme::{should_use_colors, KitupTheme};

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Progress plus captured script output and probe details.
    Verbose,
    /// Show progress and status only.
    #[default]
    Normal,
    /// Show step outcomes and errors only.
    Quiet,
}

impl OutputMode {
    /// Resolve the mode from the global verbosity flags.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Check if captured script output is echoed live.
    pub fn shows_command_output(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows per-step progress lines.
    pub fn shows_progress(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if probe details are shown for skipped steps.
    pub fn shows_details(&self) -> bool {
        matches!(self, Self::Verbose)
    }
}

/// Echo captured script output to stderr, one dim line at a time.
///
/// Used when scripts do not share the terminal (CI, piped output).
pub fn live_output_callback(step: &str) -> OutputCallback {
    let theme = if should_use_colors() {
        KitupTheme::new()
    } else {
        KitupTheme::plain()
    };
    let prefix = format!("  {} » ", step);

    Box::new(move |line: OutputLine| {
        let text = match &line {
            OutputLine::Stdout(s) | OutputLine::Stderr(s) => s.trim_end(),
        };
        if text.is_empty() {
            return;
        }
        eprintln!("{}", theme.dim.apply_to(format!("{}{}", prefix, text)));
    })
}
