use anyhow::{Context, Result};
use clap::Parser;
use driver_installer_core::{
    install_scripts, venv_scripts_dir, FetchConfig, InstallCommand, InstallOptions, Platform,
};
use serde_json::json;
use std::path::PathBuf;

use crate::console::Console;

/// Install hook: downloads ChromeDriver for this platform and installs it
/// into the target environment.
#[derive(Debug, Parser)]
#[command(name = "driver-installer", version)]
#[command(about = "Download, verify and install the ChromeDriver executable", long_about = None)]
pub struct Cli {
    /// ChromeDriver version to install (MAJOR.MINOR). Defaults to the latest release.
    #[arg(long, env = "CHROMEDRIVER_VERSION")]
    pub chromedriver_version: Option<String>,

    /// Comma-separated list of accepted archive checksums (MD5 or SHA-256).
    /// Only enforced together with --chromedriver-version.
    #[arg(long, env = "CHROMEDRIVER_CHECKSUMS")]
    pub chromedriver_checksums: Option<String>,

    /// Directory the archive is extracted into.
    #[arg(long, default_value = driver_installer_core::config::DEFAULT_BUILD_DIR)]
    pub build_dir: PathBuf,

    /// Directory the executables are installed into.
    /// Defaults to the scripts directory of $VIRTUAL_ENV when set.
    #[arg(long)]
    pub install_dir: Option<PathBuf>,

    /// Directory holding cached archives. Defaults to the system temp dir.
    #[arg(long, env = "CHROMEDRIVER_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Page scanned for the latest release.
    #[arg(long, env = "CHROMEDRIVER_INFO_URL", default_value = driver_installer_core::config::DEFAULT_INFO_URL)]
    pub info_url: String,

    /// Download URL template with {version}, {os} and {arch} placeholders.
    #[arg(long, env = "CHROMEDRIVER_URL_TEMPLATE", default_value = driver_installer_core::config::DEFAULT_URL_TEMPLATE)]
    pub url_template: String,

    /// Print the resulting paths as JSON instead of status lines.
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn fetch_config(&self) -> FetchConfig {
        let config = FetchConfig::default()
            .with_info_url(&self.info_url)
            .with_url_template(&self.url_template)
            .with_build_dir(&self.build_dir);

        match &self.cache_dir {
            Some(dir) => config.with_cache_dir(dir),
            None => config,
        }
    }

    pub fn install_options(&self) -> InstallOptions {
        InstallOptions::from_raw(
            self.chromedriver_version.as_deref(),
            self.chromedriver_checksums.as_deref(),
        )
    }

    /// Scripts directory to install into, if any.
    pub fn scripts_dir(&self) -> Option<PathBuf> {
        self.install_dir.clone().or_else(|| {
            std::env::var_os("VIRTUAL_ENV")
                .filter(|venv| !venv.is_empty())
                .map(|venv| venv_scripts_dir(&PathBuf::from(venv)))
        })
    }

    pub async fn run(self) -> Result<()> {
        let platform = Platform::detect();
        tracing::debug!(%platform, "Detected platform");

        let command = InstallCommand::new(self.fetch_config(), platform.clone())
            .context("failed to set up the HTTP client")?;

        let mut console = Console::new(!self.json);
        let extracted = command
            .run(&self.install_options(), |event| console.render(&event))
            .await?;

        let installed = match self.scripts_dir() {
            Some(dir) => {
                let installed = install_scripts(&extracted, &dir)
                    .with_context(|| format!("failed to install into {}", dir.display()))?;
                console.installed(&installed);
                installed
            }
            None => Vec::new(),
        };

        if self.json {
            let report = json!({
                "platform": platform,
                "extracted": extracted,
                "installed": installed,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else if installed.is_empty() {
            for path in extracted.iter() {
                println!("{}", path.display());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_install_options_from_args() {
        let cli = Cli::parse_from([
            "driver-installer",
            "--chromedriver-version=2.10",
            "--chromedriver-checksums=foo, bar,baz",
        ]);
        let options = cli.install_options();
        assert_eq!(options.version.as_deref(), Some("2.10"));
        assert_eq!(
            options.checksums.iter().collect::<Vec<_>>(),
            vec!["foo", "bar", "baz"]
        );
    }

    #[test]
    fn test_fetch_config_from_args() {
        let cli = Cli::parse_from([
            "driver-installer",
            "--build-dir",
            "/tmp/build",
            "--cache-dir",
            "/tmp/cache",
            "--url-template",
            "http://mirror.local/{version}/chromedriver_{os}{arch}.zip",
        ]);
        let config = cli.fetch_config();
        assert_eq!(config.build_dir, PathBuf::from("/tmp/build"));
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/cache"));
        assert_eq!(
            config.download_url("2.41", "linux", "64"),
            "http://mirror.local/2.41/chromedriver_linux64.zip"
        );
    }

    #[test]
    fn test_explicit_install_dir_wins() {
        let cli = Cli::parse_from(["driver-installer", "--install-dir", "/opt/bin"]);
        assert_eq!(cli.scripts_dir(), Some(PathBuf::from("/opt/bin")));
    }
}
