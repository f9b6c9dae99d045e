//! Status command implementation.
//!
//! The `kitup status` command runs every capability check read-only and
//! reports which steps are already configured.

use serde::Serialize;

use crate::cli::args::StatusArgs;
use crate::environment::EnvironmentFacts;
use crate::error::{KitupError, Result};
use crate::probe::{run_check, CheckResult, ProbeContext};
use crate::steps::StepPlan;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// Probe outcome for one step.
#[derive(Debug, Clone, Serialize)]
pub struct StepStatus {
    pub name: String,
    pub title: String,
    pub script: String,
    pub script_exists: bool,
    #[serde(flatten)]
    pub check: CheckResult,
}

/// Everything `status --json` prints.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub environment: Option<EnvironmentFacts>,
    pub environment_error: Option<String>,
    pub steps: Vec<StepStatus>,
}

/// Probe every step of `plan` without side effects.
pub fn collect_status(plan: &StepPlan, ctx: &ProbeContext) -> Vec<StepStatus> {
    plan.steps()
        .iter()
        .map(|step| StepStatus {
            name: step.name.clone(),
            title: step.title.clone(),
            script: step.executable.display().to_string(),
            script_exists: step.executable.is_file(),
            check: run_check(&step.check, ctx),
        })
        .collect()
}

/// The status command implementation.
pub struct StatusCommand {
    context: CommandContext,
    args: StatusArgs,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(context: CommandContext, args: StatusArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &StatusArgs {
        &self.args
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = self.context.probe_context();
        let config = self.context.load_config()?;
        let plan = self.context.plan(&config, &ctx)?;

        let (environment, environment_error) = match EnvironmentFacts::detect(&ctx.path_entries())
        {
            Ok(facts) => (Some(facts), None),
            Err(e) => (None, Some(e.to_string())),
        };

        let report = StatusReport {
            environment,
            environment_error,
            steps: collect_status(&plan, &ctx),
        };

        if self.args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| KitupError::Other(e.into()))?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        ui.show_header("kitup - Status");
        match (&report.environment, &report.environment_error) {
            (Some(facts), _) => ui.message(&format!(
                "Environment: {} · {}",
                facts.operating_system, facts.package_manager
            )),
            (None, Some(err)) => ui.warning(err),
            (None, None) => {}
        }
        ui.message("");

        for step in &report.steps {
            if step.check.satisfied {
                ui.success(&format!("{} - configured", step.name));
            } else {
                let detail = step
                    .check
                    .details
                    .as_deref()
                    .unwrap_or(&step.check.description);
                ui.message(&format!("○ {} - not configured: {}", step.name, detail));
            }
            if !step.script_exists {
                ui.warning(&format!("{}: script missing at {}", step.name, step.script));
            }
        }

        let pending = report.steps.iter().filter(|s| !s.check.satisfied).count();
        ui.message("");
        if pending == 0 {
            ui.message("Everything is configured.");
        } else {
            ui.message(&format!("{} step(s) would run. Run 'kitup run'.", pending));
        }

        Ok(CommandResult::success())
    }
}
