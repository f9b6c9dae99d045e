//! Probe context: where checks look for files and commands.
//!
//! Node installed through nvm is not on PATH in a non-interactive process,
//! because nvm is activated from the user's shell rc file. The context
//! therefore appends every `$NVM_DIR/versions/node/*/bin` directory to the
//! PATH it searches, newest version first.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Ambient environment a capability check is evaluated against.
#[derive(Debug, Clone)]
pub struct ProbeContext {
    home: PathBuf,
    base_path: Vec<PathBuf>,
    nvm_dir: PathBuf,
}

impl ProbeContext {
    /// Build a context from the process PATH and `NVM_DIR` for `home`.
    pub fn from_env_at(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let nvm_dir = std::env::var_os("NVM_DIR")
            .map(PathBuf::from)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| home.join(".nvm"));

        Self {
            home,
            base_path: parse_system_path(),
            nvm_dir,
        }
    }

    /// Build a context with an explicit home and PATH.
    ///
    /// `nvm_dir` defaults to `<home>/.nvm`.
    pub fn new(home: impl Into<PathBuf>, base_path: Vec<PathBuf>) -> Self {
        let home = home.into();
        let nvm_dir = home.join(".nvm");
        Self {
            home,
            base_path,
            nvm_dir,
        }
    }

    /// Override the nvm install root.
    pub fn with_nvm_dir(mut self, nvm_dir: impl Into<PathBuf>) -> Self {
        self.nvm_dir = nvm_dir.into();
        self
    }

    /// Home directory checks resolve relative paths against.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// nvm install root.
    pub fn nvm_dir(&self) -> &Path {
        &self.nvm_dir
    }

    /// Resolve a check path: absolute paths are kept, others join `home`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.home.join(path)
        }
    }

    /// Directories searched for commands: base PATH, then nvm node bins.
    ///
    /// Computed on every call so that a freshly installed node is seen
    /// without rebuilding the context.
    pub fn path_entries(&self) -> Vec<PathBuf> {
        let mut entries = self.base_path.clone();
        for bin in nvm_node_bins(&self.nvm_dir) {
            if !entries.contains(&bin) {
                entries.push(bin);
            }
        }
        entries
    }

    /// PATH value for child processes.
    ///
    /// The probe PATH first, then any entries of the process PATH it lacks,
    /// so scripts always reach basic system utilities.
    pub fn joined_path(&self) -> OsString {
        let mut entries = self.path_entries();
        for dir in parse_system_path() {
            if !entries.contains(&dir) {
                entries.push(dir);
            }
        }
        std::env::join_paths(entries).unwrap_or_default()
    }

    /// Locate a command on the context PATH.
    pub fn find_command(&self, name: &str) -> Option<PathBuf> {
        resolve_tool_path(name, &self.path_entries())
    }
}

/// `bin` directories of nvm-installed node versions, newest first.
fn nvm_node_bins(nvm_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(nvm_dir.join("versions").join("node")) else {
        return Vec::new();
    };

    let mut bins: Vec<(Option<(u64, u64, u64)>, PathBuf)> = entries
        .filter_map(|e| e.ok())
        .map(|e| (node_version(&e.file_name().to_string_lossy()), e.path().join("bin")))
        .filter(|(_, p)| p.is_dir())
        .collect();
    // Newest release first; `None` sorts below every version.
    bins.sort_by(|a, b| b.cmp(a));
    bins.into_iter().map(|(_, p)| p).collect()
}

/// Parse an nvm install directory name like `v20.11.0`.
fn node_version(name: &str) -> Option<(u64, u64, u64)> {
    let mut parts = name.strip_prefix('v').unwrap_or(name).splitn(3, '.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next()?.parse().ok()?;
    Some((major, minor, patch))
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Without unix permission bits, any regular file counts.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. Does NOT use
/// the `which` command, whose behavior varies across systems.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    for dir in path_entries {
        let candidate = dir.join(tool);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}
