//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandContext`] for the settings every command shares
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::config::{load_config, resolve_scripts_dir, KitupConfig};
use crate::error::Result;
use crate::probe::ProbeContext;
use crate::shell::home_dir;
use crate::steps::StepPlan;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: u8,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: u8) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Paths and overrides shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// User home directory.
    pub home: PathBuf,

    /// Directory kitup was started in.
    pub cwd: PathBuf,

    /// `--config` override.
    pub config_path: Option<PathBuf>,

    /// `--scripts-dir` / `KITUP_SCRIPTS_DIR` override.
    pub scripts_dir: Option<PathBuf>,
}

impl CommandContext {
    /// Build the context from parsed CLI flags and the process environment.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            home: home_dir(),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_path: cli.config.clone(),
            scripts_dir: cli.scripts_dir.clone(),
        }
    }

    /// Load and validate the configuration.
    pub fn load_config(&self) -> Result<KitupConfig> {
        load_config(self.config_path.as_deref(), &self.home)
    }

    /// Directory the step scripts are read from.
    pub fn scripts_dir(&self, config: &KitupConfig) -> PathBuf {
        resolve_scripts_dir(config, self.scripts_dir.as_deref(), &self.home, &self.cwd)
    }

    /// Probe context for the current process.
    pub fn probe_context(&self) -> ProbeContext {
        ProbeContext::from_env_at(&self.home)
    }

    /// Standard step plan for this configuration.
    pub fn plan(&self, config: &KitupConfig, ctx: &ProbeContext) -> Result<StepPlan> {
        StepPlan::standard(config, &self.scripts_dir(config), ctx)
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: CommandContext,
}

impl CommandDispatcher {
    /// Create a new dispatcher.
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    /// Get the shared command context.
    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = self.context.clone();
        match &cli.command {
            Some(Commands::Run(args)) => super::run::RunCommand::new(ctx, args.clone()).execute(ui),
            Some(Commands::Status(args)) => {
                super::status::StatusCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Verify) => super::verify::VerifyCommand::new(ctx).execute(ui),
            Some(Commands::Step(args)) => {
                super::step::StepCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Block(args)) => {
                super::block::BlockCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => super::run::RunCommand::new(ctx, RunArgs::default()).execute(ui),
        }
    }
}

/// Path as given, with a leading `~` expanded against `home`.
pub(crate) fn user_path(path: &Path, home: &Path) -> PathBuf {
    crate::shell::expand_tilde(&path.to_string_lossy(), home)
}
