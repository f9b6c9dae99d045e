//! Run command implementation.
//!
//! The `kitup run` command provisions every step in order.

use crate::cli::args::RunArgs;
use crate::environment::EnvironmentFacts;
use crate::error::{KitupError, Result};
use crate::orchestrator::{Orchestrator, OutputFactory, RunOptions, RunPhase, RunProgress};
use crate::shell::{is_ci, is_elevated};
use crate::steps::format_duration;
use crate::ui::{live_output_callback, RunSummary, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    context: CommandContext,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(context: CommandContext, args: RunArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    fn build_options(&self) -> RunOptions {
        RunOptions {
            dry_run: self.args.dry_run,
            skip_verify: self.args.skip_verify,
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if is_elevated() {
            return Err(KitupError::RunningAsRoot);
        }

        let ctx = self.context.probe_context();
        let facts = EnvironmentFacts::detect(&ctx.path_entries())?;
        let config = self.context.load_config()?;
        let plan = self.context.plan(&config, &ctx)?;

        let capture = self.args.non_interactive || !ui.is_interactive() || is_ci();
        let echo = capture && ui.output_mode().shows_command_output();
        let details = ui.output_mode().shows_details();

        ui.show_header(&format!(
            "kitup · {} · {}",
            facts.operating_system, facts.package_manager
        ));
        if self.args.dry_run {
            ui.message("Dry run: nothing will be executed.");
        }

        let orchestrator = Orchestrator::new(&plan, &facts, &ctx)
            .with_extra_verify(config.verify.extra_commands.clone())
            .capture_output(capture, echo.then_some(live_output_callback as OutputFactory));

        let report = orchestrator.run(&self.build_options(), |event| match event {
            RunProgress::StepSkipped { step, check } => {
                if details {
                    ui.skipped(&format!(
                        "{} already configured ({})",
                        step.title, check.description
                    ));
                } else {
                    ui.skipped(&format!("{} already configured", step.title));
                }
            }
            RunProgress::WouldRun { step, check } => {
                let detail = check.details.as_deref().unwrap_or(&check.description);
                ui.message(&format!("Would run {} ({})", step.name, detail));
            }
            RunProgress::StepStarting { step, index, total } => {
                ui.show_progress(index + 1, total, &step.title);
            }
            RunProgress::StepFinished { result } => {
                if !result.is_failure() {
                    ui.success(&format!(
                        "{} ({})",
                        result.name,
                        format_duration(result.duration)
                    ));
                }
            }
            RunProgress::StillUnsatisfied { step, check } => {
                let detail = check.details.as_deref().unwrap_or(&check.description);
                ui.warning(&format!(
                    "{} finished but is still not fully configured: {}",
                    step.name, detail
                ));
            }
            RunProgress::Phase(RunPhase::Verifying) => ui.show_header("Verification"),
            RunProgress::ToolVerified { report } => {
                ui.show_tool(&report.name, report.display_version(), report.is_found());
            }
            RunProgress::Phase(_) => {}
        })?;

        if self.args.dry_run {
            if report.pending.is_empty() {
                ui.success("Everything is already configured");
            } else {
                ui.message(&format!("Would run: {}", report.pending.join(", ")));
            }
            return Ok(CommandResult::success());
        }

        ui.show_run_summary(&RunSummary {
            step_results: report.steps.clone(),
            total_duration: report.duration,
        });

        match report.failure() {
            Some(err) => {
                ui.error(&err.to_string());
                Ok(CommandResult::failure(err.exit_code()))
            }
            None => {
                ui.success("Provisioning complete");
                Ok(CommandResult::success())
            }
        }
    }
}
