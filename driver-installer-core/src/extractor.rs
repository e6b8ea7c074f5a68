//! Archive extraction for the downloaded driver zip.
//!
//! Extraction is not transactional: if an entry fails midway, everything
//! written before it stays on disk.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::result::ZipError;

use crate::error::{InstallError, Result};

// ============================================================================
// ZIP Extraction
// ============================================================================

/// Extracts every entry of the zip at `archive_path` into `dest_dir`.
///
/// Returns the paths of the regular files written, in archive order.
/// Entries whose path is absolute or escapes `dest_dir` are skipped.
///
/// # Errors
///
/// Returns [`InstallError::Extraction`] if the archive is corrupt or an entry
/// cannot be written, and [`InstallError::Io`] if the archive cannot be
/// opened or `dest_dir` cannot be created.
pub fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    info!(
        "Extracting {} to {}",
        archive_path.display(),
        dest_dir.display()
    );

    fs::create_dir_all(dest_dir).map_err(|e| InstallError::io(dest_dir, e))?;

    let file = File::open(archive_path).map_err(|e| InstallError::io(archive_path, e))?;

    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| InstallError::extraction(archive_path, e))?;

    let mut extracted = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let written = extract_entry(&mut archive, i, dest_dir)
            .map_err(|e| InstallError::extraction(archive_path, e))?;
        extracted.extend(written);
    }

    debug!("ZIP extraction complete: {} files", extracted.len());
    Ok(extracted)
}

fn extract_entry(
    archive: &mut zip::ZipArchive<File>,
    index: usize,
    dest_dir: &Path,
) -> std::result::Result<Option<PathBuf>, ZipError> {
    let mut entry = archive.by_index(index)?;
    let entry_path = match entry.enclosed_name() {
        Some(path) => path,
        None => {
            warn!("Skipping unsafe path in zip: {}", entry.name());
            return Ok(None);
        }
    };

    let dest_path = dest_dir.join(entry_path);

    if entry.is_dir() {
        fs::create_dir_all(&dest_path)?;
        return Ok(None);
    }

    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut outfile = File::create(&dest_path)?;
    io::copy(&mut entry, &mut outfile)?;

    #[cfg(unix)]
    set_unix_permissions(&dest_path, entry.unix_mode())?;

    Ok(Some(dest_path))
}

// ============================================================================
// Unix Permissions
// ============================================================================

#[cfg(unix)]
fn set_unix_permissions(path: &Path, mode: Option<u32>) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if let Some(mode) = mode {
        let mut mode = mode & 0o7777;
        if mode & 0o111 != 0 {
            mode |= 0o755;
        }
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }

    Ok(())
}

/// Sets executable permission on a file (Unix only).
///
/// On Windows, this is a no-op.
#[allow(unused_variables)]
pub fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| InstallError::io(path, e))?;

        let mut permissions = metadata.permissions();
        permissions.set_mode(permissions.mode() | 0o755);

        fs::set_permissions(path, permissions).map_err(|e| InstallError::io(path, e))?;

        debug!("Set executable permission on {}", path.display());
    }

    Ok(())
}
