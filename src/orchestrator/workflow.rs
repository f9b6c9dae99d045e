//! The provisioning run: probe, execute, re-probe, verify.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::environment::EnvironmentFacts;
use crate::error::{KitupError, Result};
use crate::probe::{run_check, CheckResult, ProbeContext};
use crate::shell::OutputCallback;
use crate::steps::{ProvisioningStep, StepMode, StepOutcome, StepPlan, StepResult, StepRunner};

use super::verify::{verify_tools, ToolReport};

/// Builds a live output sink for a step whose output is captured.
pub type OutputFactory = fn(&str) -> OutputCallback;

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Probing(usize),
    Skipped(usize),
    Executing(usize),
    Verifying,
    Done,
    Aborted,
}

impl RunPhase {
    /// Whether no further transitions follow.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Done | RunPhase::Aborted)
    }
}

/// Progress events emitted during a run.
#[derive(Debug)]
pub enum RunProgress<'a> {
    /// The run moved to a new phase.
    Phase(RunPhase),

    /// A step's check is satisfied; its script will not run.
    StepSkipped {
        step: &'a ProvisioningStep,
        check: &'a CheckResult,
    },

    /// A step's check is unsatisfied and dry-run is on.
    WouldRun {
        step: &'a ProvisioningStep,
        check: &'a CheckResult,
    },

    /// A step's script is about to start.
    StepStarting {
        step: &'a ProvisioningStep,
        index: usize,
        total: usize,
    },

    /// A step's script finished.
    StepFinished { result: &'a StepResult },

    /// A step succeeded but its check still fails afterwards.
    StillUnsatisfied {
        step: &'a ProvisioningStep,
        check: &'a CheckResult,
    },

    /// A tool was verified.
    ToolVerified { report: &'a ToolReport },
}

/// Options for one run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Probe and report only; execute nothing.
    pub dry_run: bool,

    /// Skip the verification pass.
    pub skip_verify: bool,
}

/// Result of a run.
#[derive(Debug)]
pub struct RunReport {
    /// Results for every step reached, in order.
    pub steps: Vec<StepResult>,

    /// Steps that would run (dry-run only).
    pub pending: Vec<String>,

    /// Verification results (empty when skipped or aborted).
    pub verification: Vec<ToolReport>,

    /// Terminal phase: `Done` or `Aborted`.
    pub phase: RunPhase,

    /// Total duration.
    pub duration: Duration,
}

impl RunReport {
    /// Whether every step reached succeeded or was skipped.
    pub fn success(&self) -> bool {
        self.phase == RunPhase::Done
    }

    /// The step that aborted the run.
    pub fn failed_step(&self) -> Option<&StepResult> {
        self.steps.iter().find(|r| r.is_failure())
    }

    /// The abort as an error, for exit-code mapping.
    pub fn failure(&self) -> Option<KitupError> {
        self.failed_step().and_then(|r| match &r.outcome {
            StepOutcome::Failed { exit_code, reason } => Some(KitupError::StepFailed {
                step: r.name.clone(),
                code: *exit_code,
                reason: reason.clone(),
            }),
            StepOutcome::NotStarted { reason } => Some(KitupError::StepExecutionError {
                step: r.name.clone(),
                message: reason.clone(),
            }),
            _ => None,
        })
    }

    /// Number of steps whose script ran.
    pub fn executed_count(&self) -> usize {
        self.steps.iter().filter(|r| !r.is_skipped()).count()
    }

    /// Number of steps skipped as already satisfied.
    pub fn skipped_count(&self) -> usize {
        self.steps.iter().filter(|r| r.is_skipped()).count()
    }
}

/// Drives a [`StepPlan`] against one environment.
pub struct Orchestrator<'a> {
    plan: &'a StepPlan,
    facts: &'a EnvironmentFacts,
    ctx: &'a ProbeContext,
    extra_verify: Vec<String>,
    capture_output: bool,
    output: Option<OutputFactory>,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator. Scripts inherit the terminal by default.
    pub fn new(plan: &'a StepPlan, facts: &'a EnvironmentFacts, ctx: &'a ProbeContext) -> Self {
        Self {
            plan,
            facts,
            ctx,
            extra_verify: Vec::new(),
            capture_output: false,
            output: None,
        }
    }

    /// Extra commands appended to the verification set.
    pub fn with_extra_verify(mut self, extra: Vec<String>) -> Self {
        self.extra_verify = extra;
        self
    }

    /// Capture script output, optionally echoing it through `output`.
    pub fn capture_output(mut self, capture: bool, output: Option<OutputFactory>) -> Self {
        self.capture_output = capture;
        self.output = output;
        self
    }

    /// Run every step in order.
    ///
    /// A satisfied step is skipped. An unsatisfied step runs exactly once.
    /// The first failure aborts the run; later steps are never invoked.
    pub fn run(
        &self,
        options: &RunOptions,
        mut on_progress: impl FnMut(RunProgress<'_>),
    ) -> Result<RunReport> {
        if self.facts.is_root {
            return Err(KitupError::RunningAsRoot);
        }

        let start = Instant::now();
        let total = self.plan.len();
        let runner = StepRunner::new(self.facts, self.ctx).capture_output(self.capture_output);

        let mut steps = Vec::new();
        let mut pending = Vec::new();

        on_progress(RunProgress::Phase(RunPhase::Init));
        info!(
            "Provisioning on {} with {}",
            self.facts.operating_system, self.facts.package_manager
        );

        for (index, step) in self.plan.steps().iter().enumerate() {
            on_progress(RunProgress::Phase(RunPhase::Probing(index)));
            let check = run_check(&step.check, self.ctx);
            debug!("Probe {}: {}", step.name, check.description);

            if check.satisfied {
                info!("Skipping {}: already configured", step.name);
                on_progress(RunProgress::Phase(RunPhase::Skipped(index)));
                on_progress(RunProgress::StepSkipped {
                    step,
                    check: &check,
                });
                steps.push(StepResult::skipped(&step.name, check.description));
                continue;
            }

            if options.dry_run {
                on_progress(RunProgress::WouldRun {
                    step,
                    check: &check,
                });
                pending.push(step.name.clone());
                continue;
            }

            on_progress(RunProgress::Phase(RunPhase::Executing(index)));
            on_progress(RunProgress::StepStarting { step, index, total });

            let step_start = Instant::now();
            let sink = self.output.map(|factory| factory(&step.name));
            let result = match runner.run(step, StepMode::Install, sink) {
                Ok(result) => result,
                Err(e) => {
                    warn!("Step '{}' could not start: {}", step.name, e);
                    let reason = match e {
                        KitupError::StepExecutionError { message, .. } => message,
                        other => other.to_string(),
                    };
                    StepResult::not_started(&step.name, step_start.elapsed(), reason)
                }
            };

            on_progress(RunProgress::StepFinished { result: &result });
            let failed = result.is_failure();
            steps.push(result);

            if failed {
                on_progress(RunProgress::Phase(RunPhase::Aborted));
                return Ok(RunReport {
                    steps,
                    pending,
                    verification: Vec::new(),
                    phase: RunPhase::Aborted,
                    duration: start.elapsed(),
                });
            }

            let after = run_check(&step.check, self.ctx);
            if !after.satisfied {
                warn!(
                    "Step {} finished but its check still fails: {}",
                    step.name,
                    after.details.as_deref().unwrap_or(&after.description)
                );
                on_progress(RunProgress::StillUnsatisfied {
                    step,
                    check: &after,
                });
            }
        }

        let mut verification = Vec::new();
        if !options.skip_verify && !options.dry_run {
            on_progress(RunProgress::Phase(RunPhase::Verifying));
            verification = verify_tools(self.ctx, &self.extra_verify);
            for report in &verification {
                on_progress(RunProgress::ToolVerified { report });
            }
        }

        on_progress(RunProgress::Phase(RunPhase::Done));
        Ok(RunReport {
            steps,
            pending,
            verification,
            phase: RunPhase::Done,
            duration: start.elapsed(),
        })
    }
}
