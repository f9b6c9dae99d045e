//! Configuration schema definitions.
//!
//! Maps the optional `~/.kitup/config.yml` file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitupConfig {
    /// Directory holding `<step>.sh` scripts. `~` is expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scripts_dir: Option<String>,

    /// Per-step overrides, keyed by step name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub steps: BTreeMap<String, StepOverride>,

    /// Verification pass settings.
    pub verify: VerifyConfig,
}

/// Overrides for a single step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepOverride {
    /// Script to run instead of `<scripts_dir>/<step>.sh`. `~` is expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,

    /// Extra environment variables passed to the script.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

/// Verification pass settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Commands reported in addition to the built-in set.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_commands: Vec<String>,
}
