//! Error types for the install pipeline.
//!
//! Every variant is fatal: the pipeline never retries and never recovers
//! locally, so callers only need to render the message and stop.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, InstallError>;

/// Errors that can occur while resolving, fetching or unpacking the driver.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Invalid --chromedriver-version={version}! Must match /{pattern}/")]
    InvalidVersion { version: String, pattern: String },

    #[error("Unable to get latest chromedriver version from {url}: {reason}")]
    Resolution { url: String, reason: String },

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error(
        "The checksum of the downloaded file '{}' matches none of the checksums {}!",
        .path.display(),
        .checksums.join(", ")
    )]
    ChecksumMismatch {
        path: PathBuf,
        checksums: Vec<String>,
    },

    #[error("Download from {url} stopped at {received} of {expected} bytes")]
    IncompleteDownload {
        url: String,
        received: u64,
        expected: u64,
    },

    #[error("Failed to extract '{}': {}", .archive.display(), .source)]
    Extraction {
        archive: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Invalid download URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download from {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("IO error at '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn extraction(archive: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Extraction {
            archive: archive.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_mismatch_lists_every_checksum() {
        let err = InstallError::ChecksumMismatch {
            path: PathBuf::from("/tmp/chromedriver_2.10.zip"),
            checksums: vec!["foo".into(), "bar".into(), "baz".into()],
        };
        let message = err.to_string();
        assert!(message.contains("matches none of the checksums foo, bar, baz!"));
        assert!(message.contains("chromedriver_2.10.zip"));
    }

    #[test]
    fn test_invalid_version_names_value_and_pattern() {
        let err = InstallError::InvalidVersion {
            version: "2.x".into(),
            pattern: r"^\d+\.\d+$".into(),
        };
        assert_eq!(
            err.to_string(),
            r"Invalid --chromedriver-version=2.x! Must match /^\d+\.\d+$/"
        );
    }
}
