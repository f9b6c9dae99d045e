//! Post-run verification report.
//!
//! Read-only: each tool is located on the probe PATH and asked for its
//! version. A missing tool is reported, never treated as an error.

use std::path::PathBuf;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::probe::ProbeContext;
use crate::shell::{execute, CommandOptions};

/// Tools every run reports on, in display order.
pub const VERIFY_COMMANDS: [&str; 5] = ["node", "npm", "tmux", "micro", "zsh"];

/// Text shown for a tool that is not on PATH.
pub const NOT_FOUND: &str = "NOT FOUND";

/// Verification outcome for one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolReport {
    pub name: String,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
}

impl ToolReport {
    /// Whether the tool was found on PATH.
    pub fn is_found(&self) -> bool {
        self.path.is_some()
    }

    /// Version text, `installed` when unknown, or `NOT FOUND`.
    pub fn display_version(&self) -> &str {
        match (&self.path, &self.version) {
            (None, _) => NOT_FOUND,
            (Some(_), Some(v)) => v,
            (Some(_), None) => "installed",
        }
    }
}

/// Flag that makes a tool print its version.
pub fn version_flag(tool: &str) -> &'static str {
    match tool {
        "tmux" => "-V",
        _ => "--version",
    }
}

/// Standard tools followed by `extra`, without duplicates.
pub fn verification_set(extra: &[String]) -> Vec<String> {
    let mut tools: Vec<String> = VERIFY_COMMANDS.iter().map(|s| s.to_string()).collect();
    for tool in extra {
        if !tools.contains(tool) {
            tools.push(tool.clone());
        }
    }
    tools
}

/// Report on every tool in the verification set.
pub fn verify_tools(ctx: &ProbeContext, extra: &[String]) -> Vec<ToolReport> {
    verification_set(extra)
        .iter()
        .map(|tool| verify_tool(ctx, tool))
        .collect()
}

/// Locate one tool and query its version.
pub fn verify_tool(ctx: &ProbeContext, tool: &str) -> ToolReport {
    let Some(path) = ctx.find_command(tool) else {
        debug!("{} not found on PATH", tool);
        return ToolReport {
            name: tool.to_string(),
            path: None,
            version: None,
        };
    };

    let mut options = CommandOptions {
        args: vec![version_flag(tool).to_string()],
        capture: true,
        ..Default::default()
    };
    // npm is a node script and needs node on PATH.
    options.env.insert("PATH".to_string(), ctx.joined_path());

    let version = match execute(&path, &options) {
        Ok(result) if result.success => {
            extract_version(&result.stdout).or_else(|| extract_version(&result.stderr))
        }
        Ok(result) => {
            debug!("{} {} exited with {:?}", tool, version_flag(tool), result.exit_code);
            None
        }
        Err(e) => {
            debug!("Could not query {} version: {}", tool, e);
            None
        }
    };

    ToolReport {
        name: tool.to_string(),
        path: Some(path),
        version,
    }
}

/// Extract a version number from command output.
pub fn extract_version(output: &str) -> Option<String> {
    let patterns = [
        r"(\d+\.\d+\.\d+)",
        r"version\s+(\d+\.\d+)",
        r"v(\d+\.\d+)",
        r"\b(\d+\.\d+[a-z]?)\b",
    ];

    for pattern in &patterns {
        if let Ok(re) = Regex::new(pattern) {
            if let Some(caps) = re.captures(output) {
                if let Some(m) = caps.get(1) {
                    return Some(m.as_str().to_string());
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn extract_version_semver() {
        assert_eq!(
            extract_version("zsh 5.9 (x86_64-ubuntu-linux-gnu)"),
            Some("5.9".to_string())
        );
        assert_eq!(extract_version("10.2.4\n"), Some("10.2.4".to_string()));
    }

    #[test]
    fn extract_version_with_v() {
        assert_eq!(extract_version("v20.11.0"), Some("20.11.0".to_string()));
    }

    #[test]
    fn extract_version_tmux_suffix() {
        assert_eq!(extract_version("tmux 3.3a"), Some("3.3a".to_string()));
    }

    #[test]
    fn extract_version_micro() {
        let output = "Version: 2.0.13\nCommit hash: 68d88b57\nCompiled on October 22, 2023";
        assert_eq!(extract_version(output), Some("2.0.13".to_string()));
    }

    #[test]
    fn extract_version_no_match() {
        assert!(extract_version("no version here").is_none());
    }

    #[test]
    fn tmux_uses_short_flag() {
        assert_eq!(version_flag("tmux"), "-V");
        assert_eq!(version_flag("node"), "--version");
    }

    #[test]
    fn verification_set_appends_extras_once() {
        let set = verification_set(&["git".to_string(), "zsh".to_string()]);
        assert_eq!(set, vec!["node", "npm", "tmux", "micro", "zsh", "git"]);
    }

    #[test]
    fn missing_tools_report_not_found() {
        let temp = TempDir::new().unwrap();
        let ctx = ProbeContext::new(temp.path(), vec![temp.path().join("bin")]);

        let reports = verify_tools(&ctx, &[]);
        assert_eq!(reports.len(), 5);
        assert!(reports.iter().all(|r| !r.is_found()));
        assert_eq!(reports[0].display_version(), NOT_FOUND);
    }

    #[cfg(unix)]
    #[test]
    fn found_tool_reports_version() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let tmux = bin.join("tmux");
        fs::write(&tmux, "#!/bin/sh\n[ \"$1\" = \"-V\" ] && echo 'tmux 3.4'\n").unwrap();
        fs::set_permissions(&tmux, fs::Permissions::from_mode(0o755)).unwrap();

        let ctx = ProbeContext::new(temp.path(), vec![bin]);
        let report = verify_tool(&ctx, "tmux");

        assert!(report.is_found());
        assert_eq!(report.display_version(), "3.4");
    }
}
