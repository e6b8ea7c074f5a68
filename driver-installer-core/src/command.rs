//! The install command invoked by the host tool's build step.

use tracing::info;

use crate::config::{FetchConfig, InstallOptions};
use crate::error::Result;
use crate::fetcher::{ArtifactFetcher, FetchEvent};
use crate::platform::Platform;
use crate::types::{ExtractedExecutableSet, Version};

/// Single entry point for host integrations.
///
/// Holds the run configuration and the detected platform; every call to
/// [`InstallCommand::run`] is an independent install.
#[derive(Debug, Clone)]
pub struct InstallCommand {
    fetcher: ArtifactFetcher,
}

impl InstallCommand {
    pub fn new(config: FetchConfig, platform: Platform) -> Result<Self> {
        Ok(Self {
            fetcher: ArtifactFetcher::new(config, platform)?,
        })
    }

    pub fn from_fetcher(fetcher: ArtifactFetcher) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &ArtifactFetcher {
        &self.fetcher
    }

    /// Validates `options` and runs the fetch pipeline.
    ///
    /// A malformed version fails with `InvalidVersion` before any network
    /// activity.
    pub async fn run<F>(&self, options: &InstallOptions, on_event: F) -> Result<ExtractedExecutableSet>
    where
        F: FnMut(FetchEvent),
    {
        let version = options.version.as_deref().map(Version::parse).transpose()?;

        info!(
            "Installing chromedriver {} ({} checksums)",
            version
                .as_ref()
                .map_or_else(|| "latest".to_string(), Version::to_string),
            options.checksums.len()
        );

        self.fetcher
            .fetch(version, &options.checksums, on_event)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstallError;
    use crate::platform::{OsFamily, WordWidth};
    use crate::types::ChecksumSet;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_malformed_version_fails_without_network() {
        let temp = TempDir::new().unwrap();
        // Unroutable URLs: any network attempt would surface as a different error.
        let config = FetchConfig::default()
            .with_info_url("http://127.0.0.1:9/info")
            .with_url_template("http://127.0.0.1:9/{version}/{os}{arch}.zip")
            .with_cache_dir(temp.path())
            .with_build_dir(temp.path().join("build"));
        let command =
            InstallCommand::new(config, Platform::new(OsFamily::Linux, WordWidth::W64)).unwrap();

        for bad in ["2", "2.23.1", "latest", "v2.41"] {
            let options = InstallOptions::new(Some(bad.to_string()), ChecksumSet::default());
            let err = command.run(&options, |_| {}).await.unwrap_err();
            assert!(
                matches!(err, InstallError::InvalidVersion { ref version, .. } if version == bad),
                "unexpected error for {bad}: {err}"
            );
        }
    }
}
