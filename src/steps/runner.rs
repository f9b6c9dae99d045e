//! Step script execution.
//!
//! A step script runs as a direct child of kitup with the user's home,
//! a PATH that includes nvm-installed node, and the detected OS and
//! package manager exported as `KITUP_*` variables.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::environment::EnvironmentFacts;
use crate::error::{KitupError, Result};
use crate::probe::{is_executable, ProbeContext};
use crate::shell::{execute, execute_streaming, tail_lines, CommandOptions, OutputCallback};
use crate::steps::result::StepResult;
use crate::steps::step::ProvisioningStep;

/// Number of stderr lines kept as a failure reason.
const REASON_TAIL_LINES: usize = 5;

/// Whether a script installs or removes its tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepMode {
    #[default]
    Install,
    Uninstall,
}

impl StepMode {
    fn args(&self) -> Vec<String> {
        match self {
            StepMode::Install => Vec::new(),
            StepMode::Uninstall => vec!["uninstall".to_string()],
        }
    }
}

/// Runs step scripts against one environment.
pub struct StepRunner<'a> {
    facts: &'a EnvironmentFacts,
    ctx: &'a ProbeContext,
    capture_output: bool,
}

impl<'a> StepRunner<'a> {
    /// Create a runner whose scripts share the terminal with kitup.
    pub fn new(facts: &'a EnvironmentFacts, ctx: &'a ProbeContext) -> Self {
        Self {
            facts,
            ctx,
            capture_output: false,
        }
    }

    /// Capture script output instead of inheriting the terminal.
    ///
    /// Captured scripts get a null stdin, so a prompt reads EOF.
    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    /// Run a step's script once.
    ///
    /// A non-zero exit is reported as a failed [`StepResult`]. An `Err` means
    /// the script could not be started at all.
    pub fn run(
        &self,
        step: &ProvisioningStep,
        mode: StepMode,
        on_output: Option<OutputCallback>,
    ) -> Result<StepResult> {
        let program = ensure_runnable(step)?;

        match mode {
            StepMode::Install => info!("Running step {}", step.name),
            StepMode::Uninstall => info!("Uninstalling step {}", step.name),
        }

        let options = CommandOptions {
            args: mode.args(),
            cwd: Some(self.ctx.home().to_path_buf()),
            env: self.script_env(step),
            capture: self.capture_output,
        };

        let result = match on_output {
            Some(callback) if self.capture_output => {
                execute_streaming(&program, &options, callback)?
            }
            _ => execute(&program, &options)?,
        };

        if result.success {
            info!("Step {} finished", step.name);
            return Ok(StepResult::succeeded(&step.name, result.duration));
        }

        let reason = match tail_lines(&result.stderr, REASON_TAIL_LINES) {
            tail if !tail.is_empty() => tail,
            _ => match result.exit_code {
                Some(code) => format!("script exited with code {}", code),
                None => "script was terminated by a signal".to_string(),
            },
        };
        warn!("Step {} failed: {}", step.name, reason);

        Ok(StepResult::failed(
            &step.name,
            result.duration,
            result.exit_code,
            reason,
        ))
    }

    /// Environment passed to a step script.
    pub fn script_env(&self, step: &ProvisioningStep) -> BTreeMap<String, OsString> {
        let mut env = BTreeMap::new();
        env.insert("HOME".to_string(), self.ctx.home().as_os_str().to_owned());
        env.insert("PATH".to_string(), self.ctx.joined_path());
        env.insert(
            "NVM_DIR".to_string(),
            self.ctx.nvm_dir().as_os_str().to_owned(),
        );
        env.insert(
            "KITUP_OS".to_string(),
            OsString::from(self.facts.operating_system.as_str()),
        );
        env.insert(
            "KITUP_PKG_MANAGER".to_string(),
            OsString::from(self.facts.package_manager.as_str()),
        );
        env.insert("KITUP_STEP".to_string(), OsString::from(&step.name));

        for (key, value) in &step.env {
            env.insert(key.clone(), OsString::from(value));
        }
        env
    }
}

/// Check the script exists and make it executable if it is not.
///
/// Returns the absolute script path; scripts run from the home directory.
fn ensure_runnable(step: &ProvisioningStep) -> Result<PathBuf> {
    let path = std::path::absolute(&step.executable).map_err(|e| {
        KitupError::StepExecutionError {
            step: step.name.clone(),
            message: format!("cannot resolve {}: {}", step.executable.display(), e),
        }
    })?;
    if !path.is_file() {
        return Err(KitupError::StepExecutionError {
            step: step.name.clone(),
            message: format!("script not found at {}", path.display()),
        });
    }

    if !is_executable(&path) {
        warn!(
            "{} is not executable, adding execute permission",
            path.display()
        );
        make_executable(&path).map_err(|e| KitupError::StepExecutionError {
            step: step.name.clone(),
            message: format!("cannot make {} executable: {}", path.display(), e),
        })?;
    }
    Ok(path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    std::fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
