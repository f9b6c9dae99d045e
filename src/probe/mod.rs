//! Capability probe: read-only "is this already installed?" checks.
//!
//! - [`CapabilityCheck`] - composable predicates over files and commands
//! - [`run_check`] - evaluate a check against a [`ProbeContext`]
//! - [`builtin`] - the checks for the standard provisioning steps
//!
//! # Example
//!
//! ```
//! use kitup::probe::{run_check, CapabilityCheck, ProbeContext};
//!
//! let home = tempfile::TempDir::new().unwrap();
//! let ctx = ProbeContext::new(home.path(), vec![]);
//! let check = CapabilityCheck::all(vec![
//!     CapabilityCheck::command("tmux"),
//!     CapabilityCheck::path(".tmux.conf"),
//! ]);
//!
//! assert!(!run_check(&check, &ctx).satisfied);
//! ```

pub mod builtin;
pub mod check;
pub mod context;

pub use builtin::{check_for, ZSH_BLOCK_ID};
pub use check::{run_check, CapabilityCheck, CheckResult};
pub use context::{is_executable, parse_system_path, resolve_tool_path, ProbeContext};
