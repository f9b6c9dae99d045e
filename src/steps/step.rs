//! Provisioning step definitions and the fixed step plan.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::KitupConfig;
use crate::error::{KitupError, Result};
use crate::probe::{check_for, CapabilityCheck, ProbeContext};
use crate::shell::expand_tilde;

/// The standard provisioning steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Zsh,
    Nvm,
    CliTools,
    Micro,
    Tmux,
}

impl StepKind {
    /// Standard steps in execution order.
    ///
    /// nvm precedes cli-tools and micro so a node runtime exists before
    /// anything that may depend on it.
    pub const ORDERED: [StepKind; 5] = [
        StepKind::Zsh,
        StepKind::Nvm,
        StepKind::CliTools,
        StepKind::Micro,
        StepKind::Tmux,
    ];

    /// Step identifier.
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::Zsh => "zsh",
            StepKind::Nvm => "nvm",
            StepKind::CliTools => "cli-tools",
            StepKind::Micro => "micro",
            StepKind::Tmux => "tmux",
        }
    }

    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            StepKind::Zsh => "zsh + Oh My Zsh",
            StepKind::Nvm => "Node via nvm",
            StepKind::CliTools => "CLI utilities",
            StepKind::Micro => "micro editor",
            StepKind::Tmux => "tmux",
        }
    }

    /// Default script file name inside the scripts directory.
    pub fn script_name(&self) -> String {
        format!("{}.sh", self.name())
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StepKind {
    type Err = KitupError;

    fn from_str(s: &str) -> Result<Self> {
        StepKind::ORDERED
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| KitupError::UnknownStep {
                name: s.to_string(),
            })
    }
}

/// One provisioning unit: a script plus the check that says it is done.
#[derive(Debug, Clone)]
pub struct ProvisioningStep {
    /// Step identifier.
    pub name: String,

    /// Human-readable title.
    pub title: String,

    /// Script that performs the step.
    pub executable: PathBuf,

    /// Position in the plan, assigned by [`StepPlan::new`].
    pub order: usize,

    /// Capability check consulted before running.
    pub check: CapabilityCheck,

    /// Extra environment variables for the script.
    pub env: BTreeMap<String, String>,
}

impl ProvisioningStep {
    /// Create a step. Its order is assigned when it joins a plan.
    pub fn new(name: &str, executable: impl Into<PathBuf>, check: CapabilityCheck) -> Self {
        Self {
            name: name.to_string(),
            title: name.to_string(),
            executable: executable.into(),
            order: 0,
            check,
            env: BTreeMap::new(),
        }
    }

    /// Set the display title.
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Add environment variables for the script.
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env.extend(env);
        self
    }
}

/// A fixed, totally ordered sequence of steps.
#[derive(Debug, Clone)]
pub struct StepPlan {
    steps: Vec<ProvisioningStep>,
}

impl StepPlan {
    /// Build a plan; each step's order is its position.
    ///
    /// Step names must be non-empty and unique.
    pub fn new(steps: Vec<ProvisioningStep>) -> Result<Self> {
        let mut seen = HashSet::new();
        for step in &steps {
            if step.name.trim().is_empty() {
                return Err(KitupError::ConfigValidationError {
                    message: "step name must not be empty".to_string(),
                });
            }
            if !seen.insert(step.name.clone()) {
                return Err(KitupError::ConfigValidationError {
                    message: format!("duplicate step '{}' in plan", step.name),
                });
            }
        }

        let steps = steps
            .into_iter()
            .enumerate()
            .map(|(order, mut step)| {
                step.order = order;
                step
            })
            .collect();

        Ok(Self { steps })
    }

    /// Build the standard plan: zsh → nvm → cli-tools → micro → tmux.
    pub fn standard(config: &KitupConfig, scripts_dir: &Path, ctx: &ProbeContext) -> Result<Self> {
        let steps = StepKind::ORDERED
            .into_iter()
            .map(|kind| {
                let overrides = config.steps.get(kind.name());
                let executable = overrides
                    .and_then(|o| o.script.as_deref())
                    .map(|s| expand_tilde(s, ctx.home()))
                    .unwrap_or_else(|| scripts_dir.join(kind.script_name()));
                let env = overrides.map(|o| o.env.clone()).unwrap_or_default();

                ProvisioningStep::new(kind.name(), executable, check_for(kind, ctx))
                    .with_title(kind.title())
                    .with_env(env)
            })
            .collect();

        Self::new(steps)
    }

    /// Steps in order.
    pub fn steps(&self) -> &[ProvisioningStep] {
        &self.steps
    }

    /// Look up a step by name.
    pub fn get(&self, name: &str) -> Option<&ProvisioningStep> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
