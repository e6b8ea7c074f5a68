//! driver-installer core library
//!
//! Downloads the ChromeDriver archive for the current platform during a
//! package install, optionally checks it against known checksums, and
//! extracts it so the host tool can install the executable.
//!
//! # Architecture
//!
//! - `types`: Core values (Version, ChecksumSet, ExtractedExecutableSet)
//! - `platform`: Host probing and platform → artifact naming
//! - `config`: Run configuration and user install options
//! - `paths`: Cache path resolution
//! - `resolver`: Latest-version lookup and version format checks
//! - `downloader`: Streaming download with progress reporting
//! - `checksum`: MD5 / SHA-256 verification of archives
//! - `extractor`: Zip extraction
//! - `fetcher`: The cache / download / validate / extract pipeline
//! - `command`: Host-facing install command
//! - `installer`: Copying extracted executables into a scripts directory
//!
//! # Example
//!
//! ```ignore
//! use driver_installer_core::{FetchConfig, InstallCommand, InstallOptions, Platform};
//!
//! let command = InstallCommand::new(FetchConfig::default(), Platform::detect())?;
//! let options = InstallOptions::from_raw(Some("2.41"), None);
//!
//! let extracted = command.run(&options, |event| println!("{:?}", event)).await?;
//! for path in extracted.iter() {
//!     println!("extracted {}", path.display());
//! }
//! ```

pub mod checksum;
pub mod command;
pub mod config;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod installer;
pub mod paths;
pub mod platform;
pub mod resolver;
pub mod types;

// Re-export commonly used types
pub use command::InstallCommand;
pub use config::{FetchConfig, InstallOptions};
pub use downloader::DownloadProgress;
pub use error::{InstallError, Result};
pub use fetcher::{ArtifactFetcher, FetchEvent};
pub use installer::{install_scripts, venv_scripts_dir};
pub use platform::{OsFamily, Platform, WordWidth};
pub use resolver::{validate_format, VersionResolver};
pub use types::{ChecksumSet, ExtractedExecutableSet, Version, VERSION_PATTERN};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
