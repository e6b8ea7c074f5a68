//! Script installation: copying extracted executables into the scripts
//! directory of the environment being installed into.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{InstallError, Result};
use crate::extractor::make_executable;
use crate::types::ExtractedExecutableSet;

/// Returns the scripts directory of a virtual environment.
///
/// - Linux/macOS: `<venv>/bin`
/// - Windows: `<venv>\Scripts`
pub fn venv_scripts_dir(venv: &Path) -> PathBuf {
    #[cfg(windows)]
    let dir = "Scripts";

    #[cfg(not(windows))]
    let dir = "bin";

    venv.join(dir)
}

/// Copies every extracted file into `scripts_dir` and marks it executable.
///
/// Existing files with the same name are overwritten. Nested entries are
/// installed under their file name only, so when two entries share a name the
/// later one wins and a warning is logged. Returns the installed paths in the
/// same order as `extracted`, with each destination listed once.
pub fn install_scripts(
    extracted: &ExtractedExecutableSet,
    scripts_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(scripts_dir).map_err(|e| InstallError::io(scripts_dir, e))?;

    let mut installed = Vec::with_capacity(extracted.len());
    let mut seen = HashSet::new();
    for source in extracted.iter() {
        let Some(file_name) = source.file_name() else {
            continue;
        };
        let dest = scripts_dir.join(file_name);

        fs::copy(source, &dest).map_err(|e| InstallError::io(&dest, e))?;
        make_executable(&dest)?;

        info!("Installed {} to {}", source.display(), dest.display());
        if seen.insert(dest.clone()) {
            installed.push(dest);
        } else {
            warn!(
                "{} overwrote an earlier entry named {}",
                source.display(),
                dest.display()
            );
        }
    }

    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_venv_scripts_dir() {
        let dir = venv_scripts_dir(Path::new("/venv"));
        #[cfg(not(windows))]
        assert_eq!(dir, PathBuf::from("/venv/bin"));
        #[cfg(windows)]
        assert_eq!(dir, PathBuf::from("/venv/Scripts"));
    }

    #[test]
    fn test_install_scripts_copies_and_overwrites() {
        let temp = TempDir::new().unwrap();
        let build = temp.path().join("build");
        let bin = temp.path().join("venv/bin");
        fs::create_dir_all(&build).unwrap();
        fs::create_dir_all(&bin).unwrap();

        let source = build.join("chromedriver");
        fs::write(&source, b"new driver").unwrap();
        fs::write(bin.join("chromedriver"), b"old driver").unwrap();

        let extracted = ExtractedExecutableSet::new(vec![source]);
        let installed = install_scripts(&extracted, &bin).unwrap();

        assert_eq!(installed, vec![bin.join("chromedriver")]);
        assert_eq!(fs::read(bin.join("chromedriver")).unwrap(), b"new driver");
    }

    #[test]
    fn test_install_scripts_name_collision_keeps_last_entry() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("build/a/chromedriver");
        let second = temp.path().join("build/b/chromedriver");
        fs::create_dir_all(first.parent().unwrap()).unwrap();
        fs::create_dir_all(second.parent().unwrap()).unwrap();
        fs::write(&first, b"from a").unwrap();
        fs::write(&second, b"from b").unwrap();

        let bin = temp.path().join("bin");
        let installed =
            install_scripts(&ExtractedExecutableSet::new(vec![first, second]), &bin).unwrap();

        assert_eq!(installed, vec![bin.join("chromedriver")]);
        assert_eq!(fs::read(bin.join("chromedriver")).unwrap(), b"from b");
    }

    #[cfg(unix)]
    #[test]
    fn test_installed_scripts_are_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let source = temp.path().join("chromedriver");
        fs::write(&source, b"driver").unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o644)).unwrap();

        let bin = temp.path().join("bin");
        let installed =
            install_scripts(&ExtractedExecutableSet::new(vec![source]), &bin).unwrap();

        let mode = fs::metadata(&installed[0]).unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0);
    }
}
