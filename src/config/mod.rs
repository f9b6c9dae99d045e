//! Configuration loading and managed configuration files.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Marker-delimited blocks in user dotfiles in [`managed_block`]
//! - Timestamped backups and atomic writes in [`backup`]
//!
//! # Example
//!
//! ```
//! use kitup::config::{load_config, write_managed_block, BlockWrite};
//! use tempfile::TempDir;
//!
//! let home = TempDir::new().unwrap();
//! let config = load_config(None, home.path()).unwrap();
//! assert!(config.scripts_dir.is_none());
//!
//! let zshrc = home.path().join(".zshrc");
//! let first = write_managed_block(&zshrc, "zsh", "alias ll='ls -la'").unwrap();
//! assert_eq!(first, BlockWrite::Created);
//! let second = write_managed_block(&zshrc, "zsh", "alias ll='ls -la'").unwrap();
//! assert_eq!(second, BlockWrite::Unchanged);
//! ```

pub mod backup;
pub mod loader;
pub mod managed_block;
pub mod schema;

pub use schema::{KitupConfig, StepOverride, VerifyConfig};

pub use loader::{
    default_config_path, load_config, load_config_file, parse_config, resolve_scripts_dir,
    validate,
};

pub use managed_block::{
    begin_marker, end_marker, read_block, render_block, strip_block, upsert_block,
    write_managed_block, BlockWrite,
};

pub use backup::{backup_file, backup_path, resolve_symlink, write_atomic};
