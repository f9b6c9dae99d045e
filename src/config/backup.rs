//! Timestamped backups and atomic file replacement.

use chrono::{DateTime, Local};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Suffix format for backup copies: `<name>.bak-<timestamp>`.
const BACKUP_TIMESTAMP: &str = "%Y%m%d%H%M%S";

/// Compute a backup path for `path` that does not exist yet.
///
/// A second backup within the same second gets a `-1`, `-2`, ... suffix.
pub fn backup_path(path: &Path, now: DateTime<Local>) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let stamp = now.format(BACKUP_TIMESTAMP);

    let base = path.with_file_name(format!("{}.bak-{}", file_name, stamp));
    if !base.exists() {
        return base;
    }

    let mut n = 1;
    loop {
        let candidate = path.with_file_name(format!("{}.bak-{}-{}", file_name, stamp, n));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Copy `path` to a fresh timestamped backup, if it exists.
pub fn backup_file(path: &Path) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    let target = backup_path(path, Local::now());
    fs::copy(path, &target)?;
    tracing::info!("Backed up {} to {}", path.display(), target.display());
    Ok(Some(target))
}

/// Follow a symlinked dotfile to the file that holds its content.
///
/// Non-links are returned as given. A dangling link resolves to where it
/// points so the write recreates the target instead of the link.
pub fn resolve_symlink(path: &Path) -> PathBuf {
    let is_link = fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if !is_link {
        return path.to_path_buf();
    }

    if let Ok(real) = fs::canonicalize(path) {
        return real;
    }

    match fs::read_link(path) {
        Ok(target) if target.is_relative() => match path.parent() {
            Some(parent) => parent.join(target),
            None => target,
        },
        Ok(target) => target,
        Err(_) => path.to_path_buf(),
    }
}

/// Replace `path` with `content` atomically.
///
/// Writes a sibling temp file, syncs it, then renames it over the target so
/// an interrupted write leaves the original untouched. Permissions of an
/// existing target are preserved. A symlink is followed and its target is
/// replaced; the link itself stays in place.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let resolved = resolve_symlink(path);
    let path = resolved.as_path();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{}.kitup-tmp", file_name));

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(&temp_path, meta.permissions())?;
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}
