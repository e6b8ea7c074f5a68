//! Run configuration.
//!
//! A single [`FetchConfig`] is built once per install run and handed to the
//! resolver and the fetcher. [`InstallOptions`] carries the per-run user
//! options (version and checksums) the host tool collected.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::paths;
use crate::types::ChecksumSet;

// =============================================================================
// Upstream Locations
// =============================================================================

/// Page scanned for the latest released version.
pub const DEFAULT_INFO_URL: &str = "https://sites.google.com/a/chromium.org/chromedriver/downloads";

/// Download URL template. Placeholders: `{version}`, `{os}`, `{arch}`.
pub const DEFAULT_URL_TEMPLATE: &str =
    "http://chromedriver.storage.googleapis.com/{version}/chromedriver_{os}{arch}.zip";

/// Default directory the archive is extracted into.
pub const DEFAULT_BUILD_DIR: &str = "build/scripts";

// =============================================================================
// Fetch Configuration
// =============================================================================

/// Locations used by a single install run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Informational page listing the latest release.
    pub info_url: String,

    /// Download URL template.
    pub url_template: String,

    /// Directory holding cached archives.
    pub cache_dir: PathBuf,

    /// Directory the archive is extracted into.
    pub build_dir: PathBuf,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            info_url: DEFAULT_INFO_URL.to_string(),
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            cache_dir: paths::default_cache_dir(),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
        }
    }
}

impl FetchConfig {
    pub fn with_info_url(mut self, url: impl Into<String>) -> Self {
        self.info_url = url.into();
        self
    }

    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_build_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.build_dir = dir.into();
        self
    }

    /// Fills the download URL template.
    pub fn download_url(&self, version: &str, os: &str, arch: &str) -> String {
        self.url_template
            .replace("{version}", version)
            .replace("{os}", os)
            .replace("{arch}", arch)
    }
}

// =============================================================================
// Install Options
// =============================================================================

/// Options supplied by the user through the host install tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallOptions {
    /// Requested version, unvalidated. `None` installs the latest release.
    #[serde(default)]
    pub version: Option<String>,

    /// Accepted archive checksums.
    #[serde(default)]
    pub checksums: ChecksumSet,
}

impl InstallOptions {
    pub fn new(version: Option<String>, checksums: ChecksumSet) -> Self {
        Self { version, checksums }
    }

    /// Builds options from the raw `--chromedriver-version` and
    /// `--chromedriver-checksums` values.
    pub fn from_raw(version: Option<&str>, checksums: Option<&str>) -> Self {
        Self {
            version: version
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            checksums: checksums
                .map(ChecksumSet::from_comma_separated)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_points_upstream() {
        let config = FetchConfig::default();
        assert_eq!(config.info_url, DEFAULT_INFO_URL);
        assert_eq!(config.url_template, DEFAULT_URL_TEMPLATE);
        assert_eq!(config.cache_dir, std::env::temp_dir());
        assert_eq!(config.build_dir, PathBuf::from(DEFAULT_BUILD_DIR));
    }

    #[test]
    fn test_download_url_fills_template() {
        let config = FetchConfig::default();
        assert_eq!(
            config.download_url("2.23", "mac", "64"),
            "http://chromedriver.storage.googleapis.com/2.23/chromedriver_mac64.zip"
        );
        assert_eq!(
            config.download_url("2.10", "win", "32"),
            "http://chromedriver.storage.googleapis.com/2.10/chromedriver_win32.zip"
        );
    }

    #[test]
    fn test_builder_methods() {
        let config = FetchConfig::default()
            .with_info_url("http://localhost/info")
            .with_url_template("http://localhost/{version}/{os}{arch}.zip")
            .with_cache_dir("/cache")
            .with_build_dir("/build");
        assert_eq!(config.info_url, "http://localhost/info");
        assert_eq!(config.cache_dir, PathBuf::from("/cache"));
        assert_eq!(config.build_dir, PathBuf::from("/build"));
        assert_eq!(
            config.download_url("2.41", "linux", "64"),
            "http://localhost/2.41/linux64.zip"
        );
    }

    #[test]
    fn test_install_options_from_raw() {
        let options = InstallOptions::from_raw(Some("2.10"), Some("abc, def"));
        assert_eq!(options.version.as_deref(), Some("2.10"));
        assert_eq!(options.checksums.len(), 2);

        let empty = InstallOptions::from_raw(Some("  "), None);
        assert_eq!(empty, InstallOptions::default());
    }

    #[test]
    fn test_install_options_deserialize() {
        let options: InstallOptions =
            serde_json::from_str(r#"{"version":"2.41","checksums":["a","b"]}"#).unwrap();
        assert_eq!(options.version.as_deref(), Some("2.41"));
        assert_eq!(options.checksums, ChecksumSet::new(["a", "b"]));
    }
}
