//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// kitup - Idempotent workstation provisioning.
#[derive(Debug, Parser)]
#[command(name = "kitup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default ~/.kitup/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the step scripts
    #[arg(short, long, global = true, env = "KITUP_SCRIPTS_DIR")]
    pub scripts_dir: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Provision every step in order (default if no command specified)
    Run(RunArgs),

    /// Show which steps are already configured
    Status(StatusArgs),

    /// Report installed tool versions
    Verify,

    /// Run a single step's script without probing
    Step(StepArgs),

    /// Write a managed block into a configuration file
    Block(BlockArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Probe and show what would run without executing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the final verification report
    #[arg(long)]
    pub skip_verify: bool,

    /// Capture script output instead of attaching scripts to the terminal
    #[arg(long)]
    pub non_interactive: bool,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `step` command.
#[derive(Debug, Clone, clap::Args)]
pub struct StepArgs {
    /// Step to run (zsh, nvm, cli-tools, micro, tmux)
    pub name: String,

    /// Pass `uninstall` to the script
    #[arg(long)]
    pub uninstall: bool,
}

/// Arguments for the `block` command.
#[derive(Debug, Clone, clap::Args)]
pub struct BlockArgs {
    /// File to update (a leading ~ is expanded)
    #[arg(long)]
    pub file: PathBuf,

    /// Block identifier used in the markers
    #[arg(long)]
    pub id: String,

    /// Read the block body from this file instead of stdin
    #[arg(long)]
    pub content_file: Option<PathBuf>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["kitup"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from(["kitup", "run", "--dry-run", "--skip-verify"]).unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert!(args.dry_run);
                assert!(args.skip_verify);
                assert!(!args.non_interactive);
            }
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn step_parses_uninstall() {
        let cli = Cli::try_parse_from(["kitup", "step", "tmux", "--uninstall"]).unwrap();
        match cli.command {
            Some(Commands::Step(args)) => {
                assert_eq!(args.name, "tmux");
                assert!(args.uninstall);
            }
            other => panic!("expected step, got {:?}", other),
        }
    }

    #[test]
    fn block_requires_file_and_id() {
        assert!(Cli::try_parse_from(["kitup", "block", "--id", "zsh"]).is_err());
        let cli =
            Cli::try_parse_from(["kitup", "block", "--file", "~/.zshrc", "--id", "zsh"]).unwrap();
        match cli.command {
            Some(Commands::Block(args)) => {
                assert_eq!(args.file, PathBuf::from("~/.zshrc"));
                assert!(args.content_file.is_none());
            }
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "kitup",
            "status",
            "--json",
            "--scripts-dir",
            "/opt/scripts",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.scripts_dir, Some(PathBuf::from("/opt/scripts")));
        assert!(cli.quiet);
    }
}
