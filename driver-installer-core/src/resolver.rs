//! Version resolution.
//!
//! Either the user names a version explicitly, or the latest release is
//! scraped from the upstream downloads page. The page is fetched once per
//! run, with no caching and no retry.

use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::error::{InstallError, Result};
use crate::types::Version;

/// Marker the downloads page puts next to the newest release.
pub const LATEST_RELEASE_PATTERN: &str = r"Latest-Release:-ChromeDriver-(\d+\.\d+)";

fn latest_release_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(LATEST_RELEASE_PATTERN).expect("latest release pattern is a valid regex")
    })
}

/// Returns true iff `candidate` is a strict `MAJOR.MINOR` version.
pub fn validate_format(candidate: &str) -> bool {
    Version::is_valid(candidate)
}

/// Extracts the first latest-release marker from a page body.
pub fn find_latest_version(body: &str) -> Option<Version> {
    latest_release_regex()
        .captures(body)
        .and_then(|caps| caps.get(1))
        .and_then(|m| Version::parse(m.as_str()).ok())
}

/// Looks up the most recent driver release.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    client: reqwest::Client,
    info_url: String,
}

impl VersionResolver {
    pub fn new(client: reqwest::Client, info_url: impl Into<String>) -> Self {
        Self {
            client,
            info_url: info_url.into(),
        }
    }

    pub fn info_url(&self) -> &str {
        &self.info_url
    }

    /// Fetches the downloads page and returns the advertised latest version.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::Resolution`] if the page cannot be fetched,
    /// answers with a non-success status, or lacks the release marker.
    pub async fn resolve_latest(&self) -> Result<Version> {
        info!("Resolving latest chromedriver version from {}", self.info_url);

        let resolution_error = |reason: String| InstallError::Resolution {
            url: self.info_url.clone(),
            reason,
        };

        let response = self
            .client
            .get(&self.info_url)
            .send()
            .await
            .map_err(|e| resolution_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(resolution_error(format!("status {}", status.as_u16())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| resolution_error(e.to_string()))?;
        let body = String::from_utf8_lossy(&bytes);
        debug!("Downloads page is {} bytes", body.len());

        let version = find_latest_version(&body)
            .ok_or_else(|| resolution_error("latest release marker not found".to_string()))?;

        info!("Latest chromedriver version is {}", version);
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_format() {
        assert!(validate_format("2.23"));
        assert!(validate_format("10.0"));
        assert!(!validate_format("2.23.1"));
        assert!(!validate_format("latest"));
        assert!(!validate_format(""));
    }

    #[test]
    fn test_find_latest_version() {
        let body = r#"<a href="...">Latest-Release:-ChromeDriver-2.41</a>"#;
        assert_eq!(find_latest_version(body).unwrap().as_str(), "2.41");
    }

    #[test]
    fn test_find_latest_version_takes_first_match() {
        let body = "Latest-Release:-ChromeDriver-2.41 ... Latest-Release:-ChromeDriver-2.40";
        assert_eq!(find_latest_version(body).unwrap().as_str(), "2.41");
    }

    #[test]
    fn test_find_latest_version_missing_marker() {
        assert!(find_latest_version("ChromeDriver 2.41").is_none());
        assert!(find_latest_version("").is_none());
    }
}
