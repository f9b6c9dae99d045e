//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`kitup run`, `kitup status`)
//! - Shared path and config resolution through [`CommandContext`]
//! - Consistent global flag handling

pub mod block;
pub mod completions;
pub mod dispatcher;
pub mod run;
pub mod status;
pub mod step;
pub mod verify;

pub use dispatcher::{Command, CommandContext, CommandDispatcher, CommandResult};
