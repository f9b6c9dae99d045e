//! Operating system and package manager detection.
//!
//! [`EnvironmentFacts`] is computed once per run and passed by reference to
//! every component that needs it. Both the operating system and the package
//! manager are closed enums; anything outside the supported combinations is
//! rejected with [`KitupError::UnsupportedEnvironment`].

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::{KitupError, Result};
use crate::probe::resolve_tool_path;
use crate::shell::is_elevated;

/// Supported operating systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingSystem {
    Linux,
    #[serde(rename = "macos")]
    MacOs,
}

impl OperatingSystem {
    /// Parse an OS name as reported by `std::env::consts::OS`.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "linux" => Ok(Self::Linux),
            "macos" => Ok(Self::MacOs),
            other => Err(KitupError::UnsupportedEnvironment {
                message: format!("operating system '{}' is not supported", other),
            }),
        }
    }

    /// Identifier exported to step scripts as `KITUP_OS`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
        }
    }

    /// Package managers accepted on this OS, in detection priority order.
    pub fn candidate_managers(&self) -> &'static [PackageManager] {
        match self {
            Self::Linux => &[
                PackageManager::Apt,
                PackageManager::Dnf,
                PackageManager::Pacman,
                PackageManager::Brew,
            ],
            Self::MacOs => &[PackageManager::Brew],
        }
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported system package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Apt,
    Dnf,
    Pacman,
    Brew,
}

impl PackageManager {
    /// Identifier exported to step scripts as `KITUP_PKG_MANAGER`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Pacman => "pacman",
            Self::Brew => "brew",
        }
    }

    /// Executable whose presence identifies this manager.
    pub fn binary(&self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Dnf => "dnf",
            Self::Pacman => "pacman",
            Self::Brew => "brew",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable facts about the machine being provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentFacts {
    pub operating_system: OperatingSystem,
    pub package_manager: PackageManager,
    pub is_root: bool,
}

impl EnvironmentFacts {
    /// Detect facts for the current process.
    pub fn detect(path_entries: &[PathBuf]) -> Result<Self> {
        Self::resolve(std::env::consts::OS, is_elevated(), |binary| {
            resolve_tool_path(binary, path_entries).is_some()
        })
    }

    /// Resolve facts from an OS name, root flag and a binary lookup.
    ///
    /// The first candidate manager for the OS whose binary is available wins.
    pub fn resolve<F>(os_name: &str, is_root: bool, has_binary: F) -> Result<Self>
    where
        F: Fn(&str) -> bool,
    {
        let operating_system = OperatingSystem::from_name(os_name)?;

        let package_manager = operating_system
            .candidate_managers()
            .iter()
            .copied()
            .find(|pm| has_binary(pm.binary()))
            .ok_or_else(|| KitupError::UnsupportedEnvironment {
                message: format!(
                    "no supported package manager found on {} (looked for: {})",
                    operating_system,
                    operating_system
                        .candidate_managers()
                        .iter()
                        .map(|pm| pm.binary())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })?;

        tracing::debug!(
            "Environment: os={} package_manager={} root={}",
            operating_system,
            package_manager,
            is_root
        );

        Ok(Self {
            operating_system,
            package_manager,
            is_root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_prefers_apt_over_brew() {
        let facts =
            EnvironmentFacts::resolve("linux", false, |b| b == "apt-get" || b == "brew").unwrap();
        assert_eq!(facts.operating_system, OperatingSystem::Linux);
        assert_eq!(facts.package_manager, PackageManager::Apt);
        assert!(!facts.is_root);
    }

    #[test]
    fn linux_detects_dnf() {
        let facts = EnvironmentFacts::resolve("linux", false, |b| b == "dnf").unwrap();
        assert_eq!(facts.package_manager, PackageManager::Dnf);
    }

    #[test]
    fn linux_detects_pacman() {
        let facts = EnvironmentFacts::resolve("linux", false, |b| b == "pacman").unwrap();
        assert_eq!(facts.package_manager, PackageManager::Pacman);
    }

    #[test]
    fn linux_falls_back_to_brew() {
        let facts = EnvironmentFacts::resolve("linux", false, |b| b == "brew").unwrap();
        assert_eq!(facts.package_manager, PackageManager::Brew);
    }

    #[test]
    fn macos_only_accepts_brew() {
        let err = EnvironmentFacts::resolve("macos", false, |b| b == "apt-get").unwrap_err();
        assert!(matches!(err, KitupError::UnsupportedEnvironment { .. }));

        let facts = EnvironmentFacts::resolve("macos", false, |b| b == "brew").unwrap();
        assert_eq!(facts.operating_system, OperatingSystem::MacOs);
        assert_eq!(facts.package_manager, PackageManager::Brew);
    }

    #[test]
    fn unknown_os_is_rejected() {
        let err = EnvironmentFacts::resolve("windows", false, |_| true).unwrap_err();
        assert!(err.to_string().contains("windows"));
    }

    #[test]
    fn missing_package_manager_is_rejected() {
        let err = EnvironmentFacts::resolve("linux", false, |_| false).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("apt-get"));
        assert!(msg.contains("pacman"));
    }

    #[test]
    fn root_flag_is_carried() {
        let facts = EnvironmentFacts::resolve("linux", true, |b| b == "apt-get").unwrap();
        assert!(facts.is_root);
    }

    #[test]
    fn identifiers_match_script_contract() {
        assert_eq!(OperatingSystem::MacOs.as_str(), "macos");
        assert_eq!(PackageManager::Apt.as_str(), "apt");
        assert_eq!(PackageManager::Apt.binary(), "apt-get");
        assert_eq!(format!("{}", PackageManager::Pacman), "pacman");
    }
}
