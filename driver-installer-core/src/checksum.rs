//! Archive checksum verification.
//!
//! The storage host publishes MD5 digests (as ETags), so those are the usual
//! input. SHA-256 digests are accepted as well; the algorithm is picked from
//! the length of each supplied hex string.

use md5::Md5;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::error::{InstallError, Result};
use crate::types::ChecksumSet;

const BUF_SIZE: usize = 64 * 1024;

/// Digest algorithms understood by the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumKind {
    Md5,
    Sha256,
}

impl ChecksumKind {
    /// Detects the digest algorithm from the length of a hex string.
    ///
    /// Anything that is not a SHA-256 digest is treated as MD5, so garbage
    /// input simply never matches.
    pub fn from_hex_length(len: usize) -> Self {
        match len {
            64 => Self::Sha256,
            _ => Self::Md5,
        }
    }
}

/// Lowercase hex digests of a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigests {
    pub md5: String,
    pub sha256: String,
}

impl FileDigests {
    pub fn get(&self, kind: ChecksumKind) -> &str {
        match kind {
            ChecksumKind::Md5 => &self.md5,
            ChecksumKind::Sha256 => &self.sha256,
        }
    }

    /// Returns the first member of `checksums` that matches these digests.
    pub fn find_match<'a>(&self, checksums: &'a ChecksumSet) -> Option<&'a str> {
        checksums.iter().find(|expected| {
            self.get(ChecksumKind::from_hex_length(expected.len()))
                .eq_ignore_ascii_case(expected)
        })
    }
}

/// Computes MD5 and SHA-256 of a file in one pass.
pub async fn digest_file(path: &Path) -> Result<FileDigests> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| InstallError::io(path, e))?;

    let mut md5 = Md5::new();
    let mut sha256 = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];

    loop {
        let n = file
            .read(&mut buf)
            .await
            .map_err(|e| InstallError::io(path, e))?;
        if n == 0 {
            break;
        }
        md5.update(&buf[..n]);
        sha256.update(&buf[..n]);
    }

    Ok(FileDigests {
        md5: format!("{:x}", md5.finalize()),
        sha256: format!("{:x}", sha256.finalize()),
    })
}

/// Returns true if the file at `path` matches any member of `checksums`.
pub async fn matches_any(path: &Path, checksums: &ChecksumSet) -> Result<bool> {
    let digests = digest_file(path).await?;
    match digests.find_match(checksums) {
        Some(matched) => {
            debug!("{} matches checksum {}", path.display(), matched);
            Ok(true)
        }
        None => {
            debug!(
                "{} (md5 {}) matches none of {}",
                path.display(),
                digests.md5,
                checksums
            );
            Ok(false)
        }
    }
}
