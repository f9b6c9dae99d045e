//! External command execution.
//!
//! Programs are spawned directly with an argument vector, never through a
//! shell string, so paths and arguments need no quoting.

use crate::error::{KitupError, Result};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Arguments passed to the program.
    pub args: Vec<String>,

    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: BTreeMap<String, OsString>,

    /// Capture stdout and stderr instead of inheriting the terminal.
    pub capture: bool,
}

/// Output line from command execution.
#[derive(Debug, Clone)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Callback for streaming output.
pub type OutputCallback = Box<dyn FnMut(OutputLine) + Send>;

fn build_command(program: &Path, options: &CommandOptions) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(&options.args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd
}

/// Retry while the executable is busy.
///
/// A script written moments ago can still be open for writing in a child
/// forked concurrently by another thread, which makes exec fail with ETXTBSY.
fn retry_busy<T>(mut f: impl FnMut() -> std::io::Result<T>) -> std::io::Result<T> {
    let mut attempts: u64 = 0;
    loop {
        match f() {
            Err(e) if is_text_busy(&e) && attempts < 5 => {
                attempts += 1;
                thread::sleep(Duration::from_millis(20 * attempts));
            }
            other => return other,
        }
    }
}

#[cfg(unix)]
fn is_text_busy(e: &std::io::Error) -> bool {
    e.raw_os_error() == Some(libc::ETXTBSY)
}

#[cfg(not(unix))]
fn is_text_busy(_e: &std::io::Error) -> bool {
    false
}

fn spawn_error(program: &Path, e: std::io::Error) -> KitupError {
    KitupError::CommandFailed {
        command: program.display().to_string(),
        message: e.to_string(),
    }
}

/// Execute a program and wait for it.
///
/// With `capture` unset the child inherits stdin, stdout and stderr so it
/// can prompt the user.
pub fn execute(program: &Path, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    let mut cmd = build_command(program, options);

    if options.capture {
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
    }

    tracing::debug!("Executing {} {:?}", program.display(), options.args);
    let output = retry_busy(|| cmd.output()).map_err(|e| spawn_error(program, e))?;
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Execute a program, forwarding each output line to `callback`.
///
/// Output is also collected into the returned result.
pub fn execute_streaming(
    program: &Path,
    options: &CommandOptions,
    mut callback: OutputCallback,
) -> Result<CommandResult> {
    let start = Instant::now();
    let mut cmd = build_command(program, options);

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!("Executing (streaming) {} {:?}", program.display(), options.args);
    let mut child = retry_busy(|| cmd.spawn()).map_err(|e| spawn_error(program, e))?;

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Err(KitupError::CommandFailed {
            command: program.display().to_string(),
            message: "child output pipes unavailable".to_string(),
        });
    };

    let (tx, rx) = mpsc::channel();
    let tx_stdout = tx.clone();
    let tx_stderr = tx;

    let stdout_handle = thread::spawn(move || {
        let reader = BufReader::new(stdout);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let _ = tx_stdout.send(OutputLine::Stdout(line));
        }
        output
    });

    let stderr_handle = thread::spawn(move || {
        let reader = BufReader::new(stderr);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let _ = tx_stderr.send(OutputLine::Stderr(line));
        }
        output
    });

    for line in rx {
        callback(line);
    }

    let stdout_output = stdout_handle.join().unwrap_or_default();
    let stderr_output = stderr_handle.join().unwrap_or_default();

    let status = child.wait().map_err(|e| spawn_error(program, e))?;
    let duration = start.elapsed();

    if status.success() {
        Ok(CommandResult::success(
            stdout_output,
            stderr_output,
            duration,
        ))
    } else {
        Ok(CommandResult::failure(
            status.code(),
            stdout_output,
            stderr_output,
            duration,
        ))
    }
}

/// Last `max_lines` non-empty lines of `output`, joined with newlines.
pub fn tail_lines(output: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = output.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}
