//! External process execution and platform queries.

pub mod command;
pub mod platform;

pub use command::{
    execute, execute_streaming, tail_lines, CommandOptions, CommandResult,
    OutputCallback, OutputLine,
};
pub use platform::{expand_tilde, home_dir, is_ci, is_elevated, resolve_user_path};
