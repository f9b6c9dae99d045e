//! Step command implementation.
//!
//! The `kitup step <name>` command runs one step's script directly,
//! without consulting its capability check. With `--uninstall` the script
//! receives the `uninstall` argument.

use crate::cli::args::StepArgs;
use crate::environment::EnvironmentFacts;
use crate::error::{KitupError, Result};
use crate::shell::{is_ci, is_elevated};
use crate::steps::{format_duration, StepKind, StepMode, StepOutcome, StepRunner};
use crate::ui::{live_output_callback, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The step command implementation.
pub struct StepCommand {
    context: CommandContext,
    args: StepArgs,
}

impl StepCommand {
    /// Create a new step command.
    pub fn new(context: CommandContext, args: StepArgs) -> Self {
        Self { context, args }
    }

    fn mode(&self) -> StepMode {
        if self.args.uninstall {
            StepMode::Uninstall
        } else {
            StepMode::Install
        }
    }
}

impl Command for StepCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let kind: StepKind = self.args.name.parse()?;

        if is_elevated() {
            return Err(KitupError::RunningAsRoot);
        }

        let ctx = self.context.probe_context();
        let facts = EnvironmentFacts::detect(&ctx.path_entries())?;
        let config = self.context.load_config()?;
        let plan = self.context.plan(&config, &ctx)?;
        let step = plan.get(kind.name()).ok_or_else(|| KitupError::UnknownStep {
            name: self.args.name.clone(),
        })?;

        let capture = !ui.is_interactive() || is_ci();
        let sink = (capture && ui.output_mode().shows_command_output())
            .then(|| live_output_callback(&step.name));

        let verb = match self.mode() {
            StepMode::Install => "Running",
            StepMode::Uninstall => "Uninstalling",
        };
        ui.message(&format!("{} {}", verb, step.title));

        let result = StepRunner::new(&facts, &ctx)
            .capture_output(capture)
            .run(step, self.mode(), sink)?;

        match result.outcome {
            StepOutcome::Failed { exit_code, reason } => {
                let err = KitupError::StepFailed {
                    step: result.name,
                    code: exit_code,
                    reason,
                };
                ui.error(&err.to_string());
                Ok(CommandResult::failure(err.exit_code()))
            }
            StepOutcome::NotStarted { reason } => Err(KitupError::StepExecutionError {
                step: result.name,
                message: reason,
            }),
            _ => {
                ui.success(&format!(
                    "{} ({})",
                    result.name,
                    format_duration(result.duration)
                ));
                Ok(CommandResult::success())
            }
        }
    }
}
