//! Cache path resolution.
//!
//! Downloaded archives are cached in the OS temp directory by default:
//!
//! - Linux: `/tmp/chromedriver_<version>.zip`
//! - macOS: `/var/folders/.../T/chromedriver_<version>.zip`
//! - Windows: `C:\Users\<User>\AppData\Local\Temp\chromedriver_<version>.zip`
//!
//! The path only depends on the cache directory and the version, so two runs
//! for the same version always address the same file.

use std::path::{Path, PathBuf};

use crate::types::Version;

/// Base name shared by the cache file and the upstream archive.
pub const ARTIFACT_NAME: &str = "chromedriver";

/// Suffix of the in-flight download next to the cache file.
const PARTIAL_SUFFIX: &str = "part";

/// Returns the default cache directory (the OS temp dir).
pub fn default_cache_dir() -> PathBuf {
    std::env::temp_dir()
}

/// Returns the cache file name for `version`, e.g. `chromedriver_2.23.zip`.
pub fn cache_file_name(version: &Version) -> String {
    format!("{}_{}.zip", ARTIFACT_NAME, version)
}

/// Returns the cache file path for `version` inside `cache_dir`.
pub fn cache_path(cache_dir: &Path, version: &Version) -> PathBuf {
    cache_dir.join(cache_file_name(version))
}

/// Returns the path a download is streamed to before it replaces `dest`.
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    dest.with_file_name(name)
}
