//! Streaming archive download with progress reporting.
//!
//! The body is streamed to `<dest>.part` and renamed over `dest` only once
//! every advertised byte has arrived, so an interrupted transfer never leaves
//! a truncated archive at the cache path.

use futures::StreamExt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{InstallError, Result};
use crate::paths;

// ============================================================================
// URL Validation
// ============================================================================

/// Schemes the upstream host is reachable over.
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Validates that a URL can be downloaded from.
///
/// Checks:
/// - URL must parse
/// - scheme must be HTTP or HTTPS
/// - a host must be present
fn validate_url(url_str: &str) -> Result<Url> {
    let invalid = |reason: &str| InstallError::InvalidUrl {
        url: url_str.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(url_str).map_err(|e| invalid(&e.to_string()))?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(invalid("scheme must be http or https"));
    }

    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }

    Ok(url)
}

// ============================================================================
// Download Progress
// ============================================================================

/// Progress information during a download.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadProgress {
    /// Bytes downloaded so far.
    pub bytes_downloaded: u64,
    /// Total bytes expected (if known from Content-Length header).
    pub total_bytes: Option<u64>,
    /// Progress percentage (0.0 to 100.0), or None if total is unknown.
    pub percent: Option<f32>,
}

impl DownloadProgress {
    pub(crate) fn new(bytes_downloaded: u64, total_bytes: Option<u64>) -> Self {
        let percent = total_bytes.map(|total| {
            if total > 0 {
                (bytes_downloaded as f32 / total as f32) * 100.0
            } else {
                100.0
            }
        });

        Self {
            bytes_downloaded,
            total_bytes,
            percent,
        }
    }

    /// Percentage rounded down to a whole number and capped at 100.
    pub fn whole_percent(&self) -> Option<u8> {
        self.percent.map(|p| p.clamp(0.0, 100.0).floor() as u8)
    }

    /// True once every advertised byte has been received.
    pub fn is_complete(&self) -> bool {
        self.total_bytes
            .map_or(false, |total| self.bytes_downloaded >= total)
    }
}

/// Result of a finished transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub bytes_downloaded: u64,
    pub total_bytes: Option<u64>,
    /// The body stream failed after the response headers arrived.
    pub interrupted: bool,
}

impl DownloadOutcome {
    /// A transfer is complete when the stream ended cleanly and reached the
    /// advertised length, if one was advertised.
    pub fn is_complete(&self) -> bool {
        !self.interrupted
            && self
                .total_bytes
                .map_or(true, |total| self.bytes_downloaded >= total)
    }
}

// ============================================================================
// Download Function
// ============================================================================

/// Downloads `url` to `dest`, reporting progress after every chunk.
///
/// On a complete transfer the data replaces `dest`. On an incomplete one,
/// whether short or cut off by a body error, the partial file is discarded,
/// `dest` is left untouched, and the outcome is returned for the caller to
/// judge. Any error after the partial file is opened also discards it.
///
/// # Errors
///
/// Returns an error if:
/// - The URL is not a valid HTTP(S) URL.
/// - The network request fails.
/// - The server returns a non-success status code.
/// - The file cannot be created, written or renamed.
pub async fn download_file<F>(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    mut progress_cb: F,
) -> Result<DownloadOutcome>
where
    F: FnMut(DownloadProgress),
{
    info!("Downloading {} to {}", url, dest.display());

    let url = validate_url(url)?;

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| InstallError::io(parent, e))?;
    }

    let response = client.get(url.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(InstallError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let total_bytes = response.content_length();
    debug!("Content-Length: {:?}", total_bytes);

    let partial = paths::partial_path(dest);
    let mut stream = response.bytes_stream();

    let body = async {
        let mut file = File::create(&partial)
            .await
            .map_err(|e| InstallError::io(&partial, e))?;

        let mut bytes_downloaded: u64 = 0;
        let mut interrupted = false;

        progress_cb(DownloadProgress::new(0, total_bytes));

        while let Some(chunk_result) = stream.next().await {
            let chunk = match chunk_result {
                Ok(chunk) => chunk,
                Err(e) => {
                    // A peer closing before Content-Length is reached surfaces here.
                    warn!("Transfer from {} interrupted: {}", url, e);
                    interrupted = true;
                    break;
                }
            };

            file.write_all(&chunk)
                .await
                .map_err(|e| InstallError::io(&partial, e))?;

            bytes_downloaded += chunk.len() as u64;
            progress_cb(DownloadProgress::new(bytes_downloaded, total_bytes));
        }

        file.flush()
            .await
            .map_err(|e| InstallError::io(&partial, e))?;

        Ok::<_, InstallError>(DownloadOutcome {
            bytes_downloaded,
            total_bytes,
            interrupted,
        })
    };
    let outcome = discard_on_error(&partial, body.await).await?;

    if !outcome.is_complete() {
        warn!(
            "Download from {} stopped at {} of {:?} bytes",
            url, outcome.bytes_downloaded, total_bytes
        );
        discard_partial(&partial).await;
        return Ok(outcome);
    }

    let renamed = tokio::fs::rename(&partial, dest)
        .await
        .map_err(|e| InstallError::io(dest, e));
    discard_on_error(&partial, renamed).await?;

    info!(
        "Download complete: {} bytes written to {}",
        outcome.bytes_downloaded,
        dest.display()
    );

    Ok(outcome)
}

/// Removes the partial file when `result` is an error, then passes it on.
async fn discard_on_error<T>(partial: &Path, result: Result<T>) -> Result<T> {
    if result.is_err() {
        discard_partial(partial).await;
    }
    result
}

async fn discard_partial(partial: &Path) {
    if let Err(e) = tokio::fs::remove_file(partial).await {
        debug!("Could not remove {}: {}", partial.display(), e);
    }
}
