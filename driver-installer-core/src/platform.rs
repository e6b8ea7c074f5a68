//! Host platform probing and the platform → artifact naming rules.
//!
//! The platform is detected once at startup and passed around as a value.
//! Only the download step looks at it, so an unsupported OS still works
//! with a validated cache hit.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{InstallError, Result};
use crate::types::Version;

/// First version published with a 64-bit mac build.
const MAC64_SINCE: (u64, u64) = (2, 23);

// ============================================================================
// Platform Descriptor
// ============================================================================

/// Operating system family of the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Mac,
    Linux,
    Windows,
    /// Anything else, carrying the OS name reported by the toolchain.
    Other(String),
}

impl OsFamily {
    /// Maps a `std::env::consts::OS` style name to a family.
    pub fn from_os_name(name: &str) -> Self {
        match name {
            "macos" | "darwin" => Self::Mac,
            "linux" => Self::Linux,
            "windows" => Self::Windows,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mac => write!(f, "mac"),
            Self::Linux => write!(f, "linux"),
            Self::Windows => write!(f, "windows"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Pointer width of the host in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordWidth {
    W32,
    W64,
}

impl WordWidth {
    pub fn bits(&self) -> u32 {
        match self {
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }
}

/// OS family plus word width, resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    pub os: OsFamily,
    pub width: WordWidth,
}

impl Platform {
    pub fn new(os: OsFamily, width: WordWidth) -> Self {
        Self { os, width }
    }

    /// Detects the current platform at runtime.
    pub fn detect() -> Self {
        #[cfg(target_pointer_width = "64")]
        let width = WordWidth::W64;
        #[cfg(not(target_pointer_width = "64"))]
        let width = WordWidth::W32;

        Self {
            os: OsFamily::from_os_name(std::env::consts::OS),
            width,
        }
    }

    /// Selects the OS token and architecture used in the download URL for
    /// `version`.
    ///
    /// - mac: 64-bit from 2.23 on, 32-bit before that
    /// - linux: the host word width
    /// - windows: always 32-bit
    pub fn artifact_target(&self, version: &Version) -> Result<ArtifactTarget> {
        let (os_token, width) = match &self.os {
            OsFamily::Mac => {
                let width = if version.is_at_least(MAC64_SINCE.0, MAC64_SINCE.1) {
                    WordWidth::W64
                } else {
                    WordWidth::W32
                };
                ("mac", width)
            }
            OsFamily::Linux => ("linux", self.width),
            OsFamily::Windows => ("win", WordWidth::W32),
            OsFamily::Other(_) => {
                return Err(InstallError::UnsupportedPlatform(self.to_string()));
            }
        };

        Ok(ArtifactTarget { os_token, width })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}bit", self.os, self.width.bits())
    }
}

// ============================================================================
// Artifact Target
// ============================================================================

/// The platform part of a download URL, e.g. `linux` + `64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactTarget {
    pub os_token: &'static str,
    pub width: WordWidth,
}

impl ArtifactTarget {
    pub fn arch_token(&self) -> String {
        self.width.bits().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn test_os_family_from_os_name() {
        assert_eq!(OsFamily::from_os_name("macos"), OsFamily::Mac);
        assert_eq!(OsFamily::from_os_name("linux"), OsFamily::Linux);
        assert_eq!(OsFamily::from_os_name("windows"), OsFamily::Windows);
        assert_eq!(
            OsFamily::from_os_name("freebsd"),
            OsFamily::Other("freebsd".into())
        );
    }

    #[test]
    fn test_platform_detect() {
        let platform = Platform::detect();
        #[cfg(target_os = "linux")]
        assert_eq!(platform.os, OsFamily::Linux);
        #[cfg(target_os = "macos")]
        assert_eq!(platform.os, OsFamily::Mac);
        #[cfg(target_os = "windows")]
        assert_eq!(platform.os, OsFamily::Windows);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(platform.width, WordWidth::W64);
    }

    #[test]
    fn test_mac_arch_depends_on_version() {
        for width in [WordWidth::W32, WordWidth::W64] {
            let mac = Platform::new(OsFamily::Mac, width);
            assert_eq!(mac.artifact_target(&v("2.23")).unwrap().width, WordWidth::W64);
            assert_eq!(mac.artifact_target(&v("2.41")).unwrap().width, WordWidth::W64);
            assert_eq!(mac.artifact_target(&v("3.0")).unwrap().width, WordWidth::W64);
            assert_eq!(mac.artifact_target(&v("2.22")).unwrap().width, WordWidth::W32);
            assert_eq!(mac.artifact_target(&v("2.9")).unwrap().width, WordWidth::W32);
            assert_eq!(mac.artifact_target(&v("2.9")).unwrap().os_token, "mac");
        }
    }

    #[test]
    fn test_linux_arch_follows_host() {
        let linux64 = Platform::new(OsFamily::Linux, WordWidth::W64);
        let linux32 = Platform::new(OsFamily::Linux, WordWidth::W32);
        let target = linux64.artifact_target(&v("2.10")).unwrap();
        assert_eq!(target.os_token, "linux");
        assert_eq!(target.arch_token(), "64");
        assert_eq!(linux32.artifact_target(&v("2.41")).unwrap().arch_token(), "32");
    }

    #[test]
    fn test_windows_is_always_32() {
        for width in [WordWidth::W32, WordWidth::W64] {
            let target = Platform::new(OsFamily::Windows, width)
                .artifact_target(&v("2.41"))
                .unwrap();
            assert_eq!(target.os_token, "win");
            assert_eq!(target.width, WordWidth::W32);
        }
    }

    #[test]
    fn test_unsupported_platform_is_named() {
        let platform = Platform::new(OsFamily::Other("solaris".into()), WordWidth::W64);
        let err = platform.artifact_target(&v("2.41")).unwrap_err();
        assert!(matches!(err, InstallError::UnsupportedPlatform(_)));
        assert!(err.to_string().contains("solaris"));
    }
}
