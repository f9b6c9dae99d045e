//! Command-line interface for kitup.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{BlockArgs, Cli, Commands, CompletionsArgs, RunArgs, StatusArgs, StepArgs};
pub use commands::{Command, CommandContext, CommandDispatcher, CommandResult};
