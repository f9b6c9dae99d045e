//! kitup - Idempotent workstation provisioning.
//!
//! kitup brings a fresh Linux or macOS machine to a known-good developer
//! setup (zsh with Oh My Zsh, Node via nvm, a handful of CLI utilities, the
//! micro editor and tmux) by running one shell script per step. Before each
//! step a read-only capability check decides whether the script needs to
//! run at all, so re-running kitup on a configured machine changes nothing.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading and managed blocks in dotfiles
//! - [`environment`] - Operating system and package manager detection
//! - [`error`] - Error types and result aliases
//! - [`orchestrator`] - Ordered, fail-fast provisioning runs and verification
//! - [`probe`] - Capability checks
//! - [`shell`] - External process execution
//! - [`steps`] - Step definitions and script execution
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use kitup::config::KitupConfig;
//! use kitup::probe::{run_check, ProbeContext};
//! use kitup::steps::StepPlan;
//! use std::path::Path;
//!
//! let home = tempfile::TempDir::new().unwrap();
//! let ctx = ProbeContext::new(home.path(), vec![]);
//! let plan = StepPlan::standard(&KitupConfig::default(), Path::new("scripts"), &ctx).unwrap();
//!
//! // Nothing is installed in an empty home with an empty PATH.
//! assert!(plan.steps().iter().all(|s| !run_check(&s.check, &ctx).satisfied));
//! ```

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod orchestrator;
pub mod probe;
pub mod shell;
pub mod steps;
pub mod ui;

pub use error::{KitupError, Result};
