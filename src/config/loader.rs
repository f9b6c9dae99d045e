//! Configuration file discovery and loading.
//!
//! Lookup order:
//! 1. `--config <path>` (must exist)
//! 2. `~/.kitup/config.yml` (optional)
//! 3. Built-in defaults

use crate::config::schema::KitupConfig;
use crate::error::{KitupError, Result};
use crate::shell::resolve_user_path;
use crate::steps::StepKind;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config location under the user's home.
pub fn default_config_path(home: &Path) -> PathBuf {
    home.join(".kitup").join("config.yml")
}

/// Load configuration, falling back to defaults when no file exists.
///
/// An explicitly requested file that does not exist is an error.
pub fn load_config(config_override: Option<&Path>, home: &Path) -> Result<KitupConfig> {
    let config = if let Some(path) = config_override {
        load_config_file(path)?
    } else {
        let path = default_config_path(home);
        if path.exists() {
            load_config_file(&path)?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            KitupConfig::default()
        }
    };

    validate(&config)?;
    Ok(config)
}

/// Load and parse a single config file.
pub fn load_config_file(path: &Path) -> Result<KitupConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            KitupError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            KitupError::Io(e)
        }
    })?;

    tracing::debug!("Loaded config from {}", path.display());
    parse_config(&content, path)
}

/// Parse YAML content into [`KitupConfig`].
///
/// An empty file is treated as an empty mapping.
pub fn parse_config(content: &str, source_path: &Path) -> Result<KitupConfig> {
    if content.trim().is_empty() {
        return Ok(KitupConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| KitupError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Reject overrides for steps that are not part of the plan.
pub fn validate(config: &KitupConfig) -> Result<()> {
    let unknown: Vec<&str> = config
        .steps
        .keys()
        .filter(|name| name.parse::<StepKind>().is_err())
        .map(|s| s.as_str())
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(KitupError::ConfigValidationError {
            message: format!(
                "unknown step(s) in config: {} (known: {})",
                unknown.join(", "),
                StepKind::ORDERED
                    .iter()
                    .map(|k| k.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })
    }
}

/// Resolve the directory step scripts live in.
///
/// Priority: `--scripts-dir` / `KITUP_SCRIPTS_DIR`, then `scripts_dir` from
/// config, then `scripts/` under the current directory. The result is
/// always absolute; relative values are taken from `cwd`.
pub fn resolve_scripts_dir(
    config: &KitupConfig,
    cli_override: Option<&Path>,
    home: &Path,
    cwd: &Path,
) -> PathBuf {
    if let Some(dir) = cli_override {
        return resolve_user_path(&dir.to_string_lossy(), home, cwd);
    }
    if let Some(dir) = &config.scripts_dir {
        return resolve_user_path(dir, home, cwd);
    }
    cwd.join("scripts")
}
