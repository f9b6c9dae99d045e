//! Error types for kitup operations.
//!
//! This module defines [`KitupError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Environment problems (root, unknown OS, no package manager) abort before
//!   any step runs
//! - A failing step aborts the remaining sequence
//! - Use `anyhow::Error` (via `KitupError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for kitup operations.
#[derive(Debug, Error)]
pub enum KitupError {
    /// Provisioning a personal environment must not run as root.
    #[error("Refusing to run as root: run kitup as the user who owns the environment")]
    RunningAsRoot,

    /// Operating system or package manager is not supported.
    #[error("Unsupported environment: {message}")]
    UnsupportedEnvironment { message: String },

    /// Explicitly requested configuration file does not exist.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Referenced step is not part of the plan.
    #[error("Unknown step: {name}")]
    UnknownStep { name: String },

    /// Step could not be started (missing script, bad permissions).
    #[error("Step '{step}' failed: {message}")]
    StepExecutionError { step: String, message: String },

    /// Step script exited non-zero.
    #[error("Step '{step}' {}: {reason}", exit_status(.code))]
    StepFailed {
        step: String,
        code: Option<i32>,
        reason: String,
    },

    /// External command could not be started.
    #[error("Failed to run {command}: {message}")]
    CommandFailed { command: String, message: String },

    /// Managed block markers in a file are malformed.
    #[error("Malformed managed block '{id}' in {path}: {message}")]
    MalformedBlock {
        path: PathBuf,
        id: String,
        message: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KitupError {
    /// Process exit code for this error.
    ///
    /// Environment problems exit with 2, everything else with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            KitupError::RunningAsRoot | KitupError::UnsupportedEnvironment { .. } => 2,
            _ => 1,
        }
    }
}

/// How a script ended, for error messages.
fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with code {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

/// Result type alias for kitup operations.
pub type Result<T> = std::result::Result<T, KitupError>;
