//! Platform queries.

use std::path::PathBuf;

/// Check if running in a CI environment.
///
/// Used to force non-interactive output in `main()`.
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Check if running as root.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// Home directory of the invoking user.
///
/// Falls back to `$HOME`, then to the current directory.
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .or_else(|| std::env::var_os("HOME").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Expand a leading `~` or `~/` against `home`.
pub fn expand_tilde(path: &str, home: &std::path::Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// Expand a leading `~` and anchor a relative result at `cwd`.
pub fn resolve_user_path(path: &str, home: &std::path::Path, cwd: &std::path::Path) -> PathBuf {
    let expanded = expand_tilde(path, home);
    if expanded.is_relative() {
        cwd.join(expanded)
    } else {
        expanded
    }
}
