//! Capability check implementations.
//!
//! A capability check answers "is this tool already in its desired state?"
//! by reading the filesystem and PATH. Checks never write, never spawn
//! processes and never touch the network; a missing file or command is a
//! normal unsatisfied result, not an error.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use super::context::ProbeContext;

/// A read-only predicate over the ambient environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityCheck {
    /// Command resolves on the context PATH and is executable.
    CommandAvailable { name: String },

    /// File or directory exists. Relative paths resolve against home.
    PathExists { path: PathBuf },

    /// Directory exists and has at least one entry.
    DirNotEmpty { path: PathBuf },

    /// File exists and contains the given text.
    FileContains { path: PathBuf, needle: String },

    /// All checks must pass.
    All { checks: Vec<CapabilityCheck> },

    /// Any check passing is sufficient.
    Any { checks: Vec<CapabilityCheck> },
}

impl CapabilityCheck {
    /// Shorthand for [`CapabilityCheck::CommandAvailable`].
    pub fn command(name: &str) -> Self {
        Self::CommandAvailable {
            name: name.to_string(),
        }
    }

    /// Shorthand for [`CapabilityCheck::PathExists`].
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::PathExists { path: path.into() }
    }

    /// Shorthand for [`CapabilityCheck::DirNotEmpty`].
    pub fn dir_not_empty(path: impl Into<PathBuf>) -> Self {
        Self::DirNotEmpty { path: path.into() }
    }

    /// Shorthand for [`CapabilityCheck::FileContains`].
    pub fn file_contains(path: impl Into<PathBuf>, needle: impl Into<String>) -> Self {
        Self::FileContains {
            path: path.into(),
            needle: needle.into(),
        }
    }

    /// Shorthand for [`CapabilityCheck::All`].
    pub fn all(checks: Vec<CapabilityCheck>) -> Self {
        Self::All { checks }
    }

    /// Shorthand for [`CapabilityCheck::Any`].
    pub fn any(checks: Vec<CapabilityCheck>) -> Self {
        Self::Any { checks }
    }
}

/// Result of running a capability check.
///
/// The `description` field is user-visible: it appears in skip messages
/// and in `kitup status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// Whether the desired end state is already present.
    pub satisfied: bool,

    /// Description of what was checked.
    pub description: String,

    /// Details about why the check was not satisfied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CheckResult {
    /// Create a satisfied result.
    pub fn satisfied(description: impl Into<String>) -> Self {
        Self {
            satisfied: true,
            description: description.into(),
            details: None,
        }
    }

    /// Create an unsatisfied result.
    pub fn unsatisfied(description: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            satisfied: false,
            description: description.into(),
            details: Some(details.into()),
        }
    }
}

/// Run a capability check against a context.
pub fn run_check(check: &CapabilityCheck, ctx: &ProbeContext) -> CheckResult {
    match check {
        CapabilityCheck::CommandAvailable { name } => check_command(name, ctx),
        CapabilityCheck::PathExists { path } => check_path_exists(path, ctx),
        CapabilityCheck::DirNotEmpty { path } => check_dir_not_empty(path, ctx),
        CapabilityCheck::FileContains { path, needle } => check_file_contains(path, needle, ctx),
        CapabilityCheck::All { checks } => check_all(checks, ctx),
        CapabilityCheck::Any { checks } => check_any(checks, ctx),
    }
}

fn check_command(name: &str, ctx: &ProbeContext) -> CheckResult {
    match ctx.find_command(name) {
        Some(path) => CheckResult::satisfied(format!("{} at {}", name, path.display())),
        None => CheckResult::unsatisfied(
            format!("Command missing: {}", name),
            "Not found on PATH",
        ),
    }
}

fn check_path_exists(path: &std::path::Path, ctx: &ProbeContext) -> CheckResult {
    let full_path = ctx.resolve(path);
    if full_path.exists() {
        CheckResult::satisfied(format!("Path exists: {}", path.display()))
    } else {
        CheckResult::unsatisfied(
            format!("Path missing: {}", path.display()),
            format!("Expected at: {}", full_path.display()),
        )
    }
}

fn check_dir_not_empty(path: &std::path::Path, ctx: &ProbeContext) -> CheckResult {
    let full_path = ctx.resolve(path);
    let has_entries = fs::read_dir(&full_path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false);

    if has_entries {
        CheckResult::satisfied(format!("Directory populated: {}", path.display()))
    } else {
        CheckResult::unsatisfied(
            format!("Directory empty or missing: {}", path.display()),
            format!("Expected entries in: {}", full_path.display()),
        )
    }
}

fn check_file_contains(path: &std::path::Path, needle: &str, ctx: &ProbeContext) -> CheckResult {
    let full_path = ctx.resolve(path);
    match fs::read_to_string(&full_path) {
        Ok(content) if content.contains(needle) => {
            CheckResult::satisfied(format!("{} contains '{}'", path.display(), needle))
        }
        Ok(_) => CheckResult::unsatisfied(
            format!("{} lacks '{}'", path.display(), needle),
            "Marker not present",
        ),
        Err(e) => CheckResult::unsatisfied(
            format!("{} unreadable", path.display()),
            e.to_string(),
        ),
    }
}

fn check_all(checks: &[CapabilityCheck], ctx: &ProbeContext) -> CheckResult {
    let results: Vec<_> = checks.iter().map(|c| run_check(c, ctx)).collect();

    if results.iter().all(|r| r.satisfied) {
        CheckResult::satisfied(format!("All {} checks passed", checks.len()))
    } else {
        let failed: Vec<_> = results
            .iter()
            .filter(|r| !r.satisfied)
            .map(|r| r.description.clone())
            .collect();

        CheckResult::unsatisfied(
            format!("{}/{} checks failed", failed.len(), checks.len()),
            failed.join("; "),
        )
    }
}

fn check_any(checks: &[CapabilityCheck], ctx: &ProbeContext) -> CheckResult {
    let results: Vec<_> = checks.iter().map(|c| run_check(c, ctx)).collect();

    if let Some(passed) = results.iter().find(|r| r.satisfied) {
        CheckResult::satisfied(passed.description.clone())
    } else {
        CheckResult::unsatisfied(
            format!("None of {} alternatives found", checks.len()),
            results
                .iter()
                .map(|r| r.description.clone())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn ctx_for(temp: &TempDir) -> ProbeContext {
        ProbeContext::new(temp.path(), vec![temp.path().join("bin")])
    }

    fn create_fake_binary(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[test]
    fn command_available_when_on_path() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("bin/tmux"));

        let result = run_check(&CapabilityCheck::command("tmux"), &ctx_for(&temp));
        assert!(result.satisfied);
    }

    #[test]
    fn command_missing_is_unsatisfied_not_error() {
        let temp = TempDir::new().unwrap();

        let result = run_check(&CapabilityCheck::command("tmux"), &ctx_for(&temp));
        assert!(!result.satisfied);
        assert!(result.description.contains("tmux"));
    }

    #[test]
    fn path_exists_resolves_against_home() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".tmux.conf"), "").unwrap();

        let result = run_check(&CapabilityCheck::path(".tmux.conf"), &ctx_for(&temp));
        assert!(result.satisfied);
    }

    #[test]
    fn path_exists_handles_absolute_paths() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("abs.conf");
        fs::write(&file, "").unwrap();

        let other = TempDir::new().unwrap();
        let result = run_check(&CapabilityCheck::path(&file), &ctx_for(&other));
        assert!(result.satisfied);
    }

    #[test]
    fn dir_not_empty_requires_entries() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_for(&temp);
        let check = CapabilityCheck::dir_not_empty(".nvm/versions/node");

        assert!(!run_check(&check, &ctx).satisfied);

        fs::create_dir_all(temp.path().join(".nvm/versions/node")).unwrap();
        assert!(!run_check(&check, &ctx).satisfied);

        fs::create_dir_all(temp.path().join(".nvm/versions/node/v20.11.0")).unwrap();
        assert!(run_check(&check, &ctx).satisfied);
    }

    #[test]
    fn file_contains_finds_marker() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".zshrc"), "export A=1\n# marker\n").unwrap();
        let ctx = ctx_for(&temp);

        assert!(run_check(&CapabilityCheck::file_contains(".zshrc", "# marker"), &ctx).satisfied);
        assert!(!run_check(&CapabilityCheck::file_contains(".zshrc", "# other"), &ctx).satisfied);
    }

    #[test]
    fn file_contains_missing_file_is_unsatisfied() {
        let temp = TempDir::new().unwrap();
        let result = run_check(
            &CapabilityCheck::file_contains(".zshrc", "x"),
            &ctx_for(&temp),
        );
        assert!(!result.satisfied);
        assert!(result.details.is_some());
    }

    #[test]
    fn all_check_fails_on_partial_install() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("bin/tmux"));
        // ~/.tmux.conf missing

        let check = CapabilityCheck::all(vec![
            CapabilityCheck::command("tmux"),
            CapabilityCheck::path(".tmux.conf"),
        ]);

        let result = run_check(&check, &ctx_for(&temp));
        assert!(!result.satisfied);
        assert!(result.description.contains("1/2"));
        assert!(result.details.unwrap().contains(".tmux.conf"));
    }

    #[test]
    fn all_check_fails_when_config_present_but_binary_missing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".tmux.conf"), "").unwrap();

        let check = CapabilityCheck::all(vec![
            CapabilityCheck::command("tmux"),
            CapabilityCheck::path(".tmux.conf"),
        ]);

        assert!(!run_check(&check, &ctx_for(&temp)).satisfied);
    }

    #[test]
    fn any_check_accepts_alternate_binary_names() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("bin/fdfind"));

        let check = CapabilityCheck::any(vec![
            CapabilityCheck::command("fd"),
            CapabilityCheck::command("fdfind"),
        ]);

        let result = run_check(&check, &ctx_for(&temp));
        assert!(result.satisfied);
        assert!(result.description.contains("fdfind"));
    }

    #[test]
    fn any_check_fails_when_all_fail() {
        let temp = TempDir::new().unwrap();
        let check = CapabilityCheck::any(vec![
            CapabilityCheck::command("bat"),
            CapabilityCheck::command("batcat"),
        ]);

        let result = run_check(&check, &ctx_for(&temp));
        assert!(!result.satisfied);
        assert!(result.description.contains("None of 2"));
    }

    #[test]
    fn checks_are_deterministic() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".tmux.conf"), "").unwrap();
        let ctx = ctx_for(&temp);
        let check = CapabilityCheck::all(vec![
            CapabilityCheck::command("tmux"),
            CapabilityCheck::path(".tmux.conf"),
        ]);

        let first = run_check(&check, &ctx);
        let second = run_check(&check, &ctx);
        assert_eq!(first, second);
    }
}
