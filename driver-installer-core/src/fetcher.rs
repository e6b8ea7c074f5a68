//! Artifact fetcher coordinating cache, download, validation and extraction.
//!
//! The `ArtifactFetcher` is the main entry point of the pipeline. It decides
//! whether a cached archive can be trusted, downloads when it cannot, checks
//! the result against the supplied checksums and unpacks it.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::checksum;
use crate::config::FetchConfig;
use crate::downloader::{download_file, DownloadProgress};
use crate::error::{InstallError, Result};
use crate::extractor::extract_zip;
use crate::paths;
use crate::platform::Platform;
use crate::resolver::VersionResolver;
use crate::types::{ChecksumSet, ExtractedExecutableSet, Version};

// ============================================================================
// Fetch Events
// ============================================================================

/// Status updates emitted while fetching, for user-facing output.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent {
    /// No version was requested; the latest one was looked up.
    VersionResolved { version: Version },
    /// A cached archive exists at the cache path.
    CacheFound { file_name: String, path: PathBuf },
    /// The cached archive matches a supplied checksum and will be reused.
    CacheValid { path: PathBuf },
    /// The cached archive matches none of the supplied checksums.
    CacheInvalid { path: PathBuf },
    /// A download is about to start.
    DownloadStarted { url: String, dest: PathBuf },
    /// Bytes were received.
    DownloadProgress {
        url: String,
        dest: PathBuf,
        progress: DownloadProgress,
    },
    /// The transfer ended; `complete` is false if it stopped short.
    DownloadFinished { complete: bool },
    /// Extraction is about to start.
    Extracting { archive: PathBuf, dest: PathBuf },
}

// ============================================================================
// Artifact Fetcher
// ============================================================================

/// Fetches, validates and unpacks the driver archive.
#[derive(Debug, Clone)]
pub struct ArtifactFetcher {
    config: FetchConfig,
    platform: Platform,
    client: reqwest::Client,
    resolver: VersionResolver,
}

impl ArtifactFetcher {
    /// Creates a fetcher with a fresh HTTP client.
    pub fn new(config: FetchConfig, platform: Platform) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("driver-installer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(config, platform, client))
    }

    /// Creates a fetcher sharing an existing HTTP client.
    pub fn with_client(config: FetchConfig, platform: Platform, client: reqwest::Client) -> Self {
        let resolver = VersionResolver::new(client.clone(), config.info_url.clone());

        info!(
            "ArtifactFetcher initialized. Cache dir: {}, Platform: {}",
            config.cache_dir.display(),
            platform
        );

        Self {
            config,
            platform,
            client,
            resolver,
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn resolver(&self) -> &VersionResolver {
        &self.resolver
    }

    /// Runs the resolve → (reuse | download) → validate → extract pipeline.
    ///
    /// Checksums are only enforced when `version` was given explicitly and
    /// `checksums` is non-empty. In that mode a cached archive matching a
    /// checksum is reused without touching the network. Otherwise the archive
    /// is always downloaded, replacing any cached copy.
    pub async fn fetch<F>(
        &self,
        version: Option<Version>,
        checksums: &ChecksumSet,
        mut on_event: F,
    ) -> Result<ExtractedExecutableSet>
    where
        F: FnMut(FetchEvent),
    {
        let validate = version.is_some() && !checksums.is_empty();

        let version = match version {
            Some(version) => version,
            None => {
                let version = self.resolver.resolve_latest().await?;
                on_event(FetchEvent::VersionResolved {
                    version: version.clone(),
                });
                version
            }
        };

        let cache_path = paths::cache_path(&self.config.cache_dir, &version);
        debug!(
            "Fetching chromedriver {} (validate: {}) via {}",
            version,
            validate,
            cache_path.display()
        );

        if validate {
            self.fetch_validated(&version, checksums, &cache_path, &mut on_event)
                .await?;
        } else {
            self.download(&version, &cache_path, &mut on_event).await?;
        }

        on_event(FetchEvent::Extracting {
            archive: cache_path.clone(),
            dest: self.config.build_dir.clone(),
        });
        let extracted = extract_zip(&cache_path, &self.config.build_dir)?;

        info!(
            "chromedriver {} extracted: {} files",
            version,
            extracted.len()
        );
        Ok(ExtractedExecutableSet::new(extracted))
    }

    /// Reuses a matching cached archive, or downloads and verifies a new one.
    async fn fetch_validated<F>(
        &self,
        version: &Version,
        checksums: &ChecksumSet,
        cache_path: &Path,
        on_event: &mut F,
    ) -> Result<()>
    where
        F: FnMut(FetchEvent),
    {
        if tokio::fs::try_exists(cache_path)
            .await
            .map_err(|e| InstallError::io(cache_path, e))?
        {
            on_event(FetchEvent::CacheFound {
                file_name: paths::cache_file_name(version),
                path: cache_path.to_path_buf(),
            });

            if checksum::matches_any(cache_path, checksums).await? {
                on_event(FetchEvent::CacheValid {
                    path: cache_path.to_path_buf(),
                });
                info!("Reusing cached {}", cache_path.display());
                return Ok(());
            }

            on_event(FetchEvent::CacheInvalid {
                path: cache_path.to_path_buf(),
            });
        }

        self.download(version, cache_path, on_event).await?;

        if !checksum::matches_any(cache_path, checksums).await? {
            return Err(InstallError::ChecksumMismatch {
                path: cache_path.to_path_buf(),
                checksums: checksums.to_vec(),
            });
        }

        Ok(())
    }

    /// Downloads the archive for `version` to `cache_path`.
    async fn download<F>(&self, version: &Version, cache_path: &Path, on_event: &mut F) -> Result<()>
    where
        F: FnMut(FetchEvent),
    {
        let url = self.download_url(version)?;

        on_event(FetchEvent::DownloadStarted {
            url: url.clone(),
            dest: cache_path.to_path_buf(),
        });

        let outcome = download_file(&self.client, &url, cache_path, |progress| {
            on_event(FetchEvent::DownloadProgress {
                url: url.clone(),
                dest: cache_path.to_path_buf(),
                progress,
            })
        })
        .await?;

        let complete = outcome.is_complete();
        on_event(FetchEvent::DownloadFinished { complete });

        if !complete {
            return Err(InstallError::IncompleteDownload {
                url,
                received: outcome.bytes_downloaded,
                expected: outcome.total_bytes.unwrap_or_default(),
            });
        }

        Ok(())
    }

    /// Builds the download URL for `version` on this fetcher's platform.
    pub fn download_url(&self, version: &Version) -> Result<String> {
        let target = self.platform.artifact_target(version)?;
        Ok(self
            .config
            .download_url(version.as_str(), target.os_token, &target.arch_token()))
    }
}
