//! Marker-delimited managed blocks inside user configuration files.
//!
//! A managed block is owned by kitup and rewritten wholesale:
//!
//! ```text
//! # >>> kitup:zsh >>>
//! alias ll='ls -la'
//! # <<< kitup:zsh <<<
//! ```
//!
//! Rewriting parses the file, strips every existing copy of the block,
//! appends the fresh block and writes the result atomically after taking a
//! timestamped backup. Rewriting with the same body is a no-op, so running
//! a step twice never duplicates alias or plugin entries.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{KitupError, Result};

use super::backup::{backup_file, resolve_symlink, write_atomic};

/// First line of the block with the given id.
pub fn begin_marker(id: &str) -> String {
    format!("# >>> kitup:{} >>>", id)
}

/// Last line of the block with the given id.
pub fn end_marker(id: &str) -> String {
    format!("# <<< kitup:{} <<<", id)
}

/// What [`write_managed_block`] did to the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockWrite {
    /// File already held this exact block; nothing was written.
    Unchanged,
    /// File did not exist and was created.
    Created,
    /// File was rewritten; the prior content was backed up.
    Updated { backup: Option<PathBuf> },
}

fn validate_id(id: &str, path: &Path) -> Result<()> {
    if id.is_empty() || id.chars().any(|c| c.is_whitespace() || c == '>' || c == '<') {
        return Err(KitupError::MalformedBlock {
            path: path.to_path_buf(),
            id: id.to_string(),
            message: "block id must be non-empty without whitespace or angle brackets".into(),
        });
    }
    Ok(())
}

/// Render a block with its markers, always ending in a newline.
pub fn render_block(id: &str, body: &str) -> String {
    let body = body.trim_end_matches(['\n', '\r']);
    if body.is_empty() {
        format!("{}\n{}\n", begin_marker(id), end_marker(id))
    } else {
        format!("{}\n{}\n{}\n", begin_marker(id), body, end_marker(id))
    }
}

/// Remove every copy of block `id` from `content`.
///
/// Text outside the block, including other blocks, is kept byte for byte.
pub fn strip_block(content: &str, id: &str, path: &Path) -> Result<String> {
    let begin = begin_marker(id);
    let end = end_marker(id);

    let mut out = String::with_capacity(content.len());
    let mut inside = false;

    for line in content.split_inclusive('\n') {
        let marker = line.trim();
        if marker == begin {
            if inside {
                return Err(malformed(path, id, "nested begin marker"));
            }
            inside = true;
        } else if marker == end {
            if !inside {
                return Err(malformed(path, id, "end marker without begin marker"));
            }
            inside = false;
        } else if !inside {
            out.push_str(line);
        }
    }

    if inside {
        return Err(malformed(path, id, "begin marker without end marker"));
    }

    Ok(out)
}

fn malformed(path: &Path, id: &str, message: &str) -> KitupError {
    KitupError::MalformedBlock {
        path: path.to_path_buf(),
        id: id.to_string(),
        message: message.to_string(),
    }
}

/// Replace block `id` in `content` with a fresh copy at the end.
pub fn upsert_block(content: &str, id: &str, body: &str, path: &Path) -> Result<String> {
    validate_id(id, path)?;

    let begin = begin_marker(id);
    let end = end_marker(id);
    if body.lines().any(|l| l.trim() == begin || l.trim() == end) {
        return Err(malformed(path, id, "block body contains its own marker"));
    }

    let stripped = strip_block(content, id, path)?;
    let kept = stripped.trim_end_matches(['\n', '\r']);
    let block = render_block(id, body);

    if kept.is_empty() {
        Ok(block)
    } else {
        Ok(format!("{}\n\n{}", kept, block))
    }
}

/// Read the body of block `id`, if present.
pub fn read_block(content: &str, id: &str) -> Option<String> {
    let begin = begin_marker(id);
    let end = end_marker(id);

    let mut lines = content.lines();
    lines.by_ref().find(|l| l.trim() == begin)?;

    let mut body = Vec::new();
    for line in lines {
        if line.trim() == end {
            return Some(body.join("\n"));
        }
        body.push(line);
    }
    None
}

/// Write block `id` with `body` into the file at `path`.
///
/// Missing files are created. Existing files are backed up to
/// `<name>.bak-<timestamp>` before the atomic rewrite. When the file
/// already contains exactly the result, nothing is touched. A symlinked
/// file is edited at its target, which is also what gets backed up.
pub fn write_managed_block(path: &Path, id: &str, body: &str) -> Result<BlockWrite> {
    let target = resolve_symlink(path);
    let path = target.as_path();
    let existing = match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    let current = existing.as_deref().unwrap_or("");
    let updated = upsert_block(current, id, body, path)?;

    match existing {
        Some(ref content) if *content == updated => {
            tracing::debug!("Block '{}' in {} already up to date", id, path.display());
            Ok(BlockWrite::Unchanged)
        }
        Some(_) => {
            let backup = backup_file(path)?;
            write_atomic(path, &updated)?;
            tracing::info!("Updated block '{}' in {}", id, path.display());
            Ok(BlockWrite::Updated { backup })
        }
        None => {
            write_atomic(path, &updated)?;
            tracing::info!("Created {} with block '{}'", path.display(), id);
            Ok(BlockWrite::Created)
        }
    }
}
