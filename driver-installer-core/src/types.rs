//! Core value types for the install pipeline.
//!
//! This module defines the values threaded through a single install run:
//! the driver version, the user-supplied checksum set and the list of files
//! produced by extraction.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{InstallError, Result};

// ============================================================================
// Version
// ============================================================================

/// Pattern every driver version must match.
pub const VERSION_PATTERN: &str = r"^\d+\.\d+$";

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // ASCII digits only; `\d` would otherwise accept any Unicode digit.
        RegexBuilder::new(VERSION_PATTERN)
            .unicode(false)
            .build()
            .expect("version pattern is a valid regex")
    })
}

/// A `MAJOR.MINOR` driver version such as `2.23`.
///
/// The original text is kept verbatim because it is used as a URL path
/// segment and as part of the cache file name. Ordering compares the numeric
/// components, so `2.9 < 2.23`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    raw: String,
    major: u64,
    minor: u64,
}

impl Version {
    /// Returns true if `candidate` is a well-formed `MAJOR.MINOR` version.
    pub fn is_valid(candidate: &str) -> bool {
        version_regex().is_match(candidate)
    }

    /// Parses a version, failing with [`InstallError::InvalidVersion`].
    pub fn parse(candidate: &str) -> Result<Self> {
        let invalid = || InstallError::InvalidVersion {
            version: candidate.to_string(),
            pattern: VERSION_PATTERN.to_string(),
        };

        if !Self::is_valid(candidate) {
            return Err(invalid());
        }

        let (major, minor) = candidate.split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            raw: candidate.to_string(),
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    /// Compares against a `(major, minor)` pair.
    pub fn is_at_least(&self, major: u64, minor: u64) -> bool {
        (self.major, self.minor) >= (major, minor)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl std::str::FromStr for Version {
    type Err = InstallError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor)
            .cmp(&(other.major, other.minor))
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

// ============================================================================
// Checksum Set
// ============================================================================

/// Ordered list of acceptable hex digests for the driver archive.
///
/// An empty set means no validation was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumSet(Vec<String>);

impl ChecksumSet {
    pub fn new<I, S>(checksums: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            checksums
                .into_iter()
                .map(|c| {
                    let c: String = c.into();
                    c.trim().to_string()
                })
                .filter(|c| !c.is_empty())
                .collect(),
        )
    }

    /// Parses a comma-separated option value such as `"abc, def"`.
    pub fn from_comma_separated(value: &str) -> Self {
        Self::new(value.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl fmt::Display for ChecksumSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

// ============================================================================
// Extracted Executables
// ============================================================================

/// Files written by extracting the driver archive, in archive order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedExecutableSet(Vec<PathBuf>);

impl ExtractedExecutableSet {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self(paths)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.0
    }
}

impl IntoIterator for ExtractedExecutableSet {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_format_accepts_major_minor() {
        for candidate in ["2.23", "2.9", "0.0", "10.100", "2.010"] {
            assert!(Version::is_valid(candidate), "{candidate} should be valid");
        }
    }

    #[test]
    fn test_version_format_rejects_everything_else() {
        for candidate in [
            "", "2", "2.", ".2", "2.23.1", "v2.23", "2.x", "abc", " 2.23", "2.23 ", "2,23",
        ] {
            assert!(!Version::is_valid(candidate), "{candidate:?} should be invalid");
        }
    }

    #[test]
    fn test_version_parse_keeps_raw_text() {
        let version = Version::parse("2.10").unwrap();
        assert_eq!(version.as_str(), "2.10");
        assert_eq!(version.to_string(), "2.10");
        assert_eq!(version.major(), 2);
        assert_eq!(version.minor(), 10);
    }

    #[test]
    fn test_version_parse_error() {
        let err = Version::parse("2.23.1").unwrap_err();
        assert!(matches!(err, InstallError::InvalidVersion { .. }));
        assert!(err.to_string().contains("2.23.1"));
    }

    #[test]
    fn test_version_ordering_is_numeric() {
        let v = |s: &str| s.parse::<Version>().unwrap();
        assert!(v("2.9") < v("2.23"));
        assert!(v("2.22") < v("2.23"));
        assert!(v("2.41") > v("2.23"));
        assert!(v("3.0") > v("2.99"));
        assert!(v("2.23").is_at_least(2, 23));
        assert!(!v("2.22").is_at_least(2, 23));
    }

    #[test]
    fn test_checksum_set_from_comma_separated() {
        let set = ChecksumSet::from_comma_separated(" foo, bar ,baz,");
        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["foo", "bar", "baz"]);
        assert_eq!(set.to_string(), "foo, bar, baz");
    }

    #[test]
    fn test_checksum_set_empty() {
        assert!(ChecksumSet::from_comma_separated("").is_empty());
        assert!(ChecksumSet::from_comma_separated(" , ").is_empty());
        assert!(ChecksumSet::default().is_empty());
    }

    #[test]
    fn test_extracted_set_iteration() {
        let set = ExtractedExecutableSet::new(vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Path::new("a"), Path::new("b")]);
        assert_eq!(set.into_paths(), vec![PathBuf::from("a"), PathBuf::from("b")]);
    }
}
