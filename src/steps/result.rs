//! Step outcomes.

use std::time::Duration;

/// How a step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Capability check was already satisfied; the script did not run.
    Skipped { reason: String },

    /// Script exited 0.
    Succeeded,

    /// Script exited non-zero (or was killed).
    Failed {
        exit_code: Option<i32>,
        reason: String,
    },

    /// Script could not be started (missing file, spawn error).
    NotStarted { reason: String },
}

impl StepOutcome {
    /// Get a display character for this outcome.
    pub fn display_char(&self) -> char {
        match self {
            StepOutcome::Succeeded => '✓',
            StepOutcome::Failed { .. } | StepOutcome::NotStarted { .. } => '✗',
            StepOutcome::Skipped { .. } => '⊘',
        }
    }

    /// Short lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            StepOutcome::Succeeded => "succeeded",
            StepOutcome::Failed { .. } => "failed",
            StepOutcome::NotStarted { .. } => "not started",
            StepOutcome::Skipped { .. } => "skipped",
        }
    }
}

/// Result of one step within a run.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Step name.
    pub name: String,

    /// Outcome.
    pub outcome: StepOutcome,

    /// Execution duration (zero when skipped).
    pub duration: Duration,
}

impl StepResult {
    /// Create a skipped result.
    pub fn skipped(name: &str, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            outcome: StepOutcome::Skipped {
                reason: reason.into(),
            },
            duration: Duration::ZERO,
        }
    }

    /// Create a success result.
    pub fn succeeded(name: &str, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            outcome: StepOutcome::Succeeded,
            duration,
        }
    }

    /// Create a failure result.
    pub fn failed(
        name: &str,
        duration: Duration,
        exit_code: Option<i32>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            name: name.to_string(),
            outcome: StepOutcome::Failed {
                exit_code,
                reason: reason.into(),
            },
            duration,
        }
    }

    /// Create a result for a script that never started.
    pub fn not_started(name: &str, duration: Duration, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            outcome: StepOutcome::NotStarted {
                reason: reason.into(),
            },
            duration,
        }
    }

    /// Whether the step failed.
    pub fn is_failure(&self) -> bool {
        matches!(
            self.outcome,
            StepOutcome::Failed { .. } | StepOutcome::NotStarted { .. }
        )
    }

    /// Whether the step was skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, StepOutcome::Skipped { .. })
    }

    /// Generate a summary line for display.
    pub fn summary_line(&self) -> String {
        let icon = self.outcome.display_char();
        match &self.outcome {
            StepOutcome::Succeeded => {
                format!("{} {} ({})", icon, self.name, format_duration(self.duration))
            }
            StepOutcome::Skipped { .. } => format!("{} {} (already configured)", icon, self.name),
            StepOutcome::Failed { exit_code, .. } => match exit_code {
                Some(code) => format!("{} {} (exit code {})", icon, self.name, code),
                None => format!("{} {} (terminated by signal)", icon, self.name),
            },
            StepOutcome::NotStarted { .. } => format!("{} {} (not started)", icon, self.name),
        }
    }
}

/// Format a duration for display.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 {
        format!("{}ms", millis)
    } else if secs < 60 {
        format!("{}.{}s", secs, millis / 100)
    } else {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    }
}
