//! Human-readable status lines on stdout.

use driver_installer_core::FetchEvent;
use std::io::{self, Write};
use std::path::PathBuf;

/// Renders fetch events as indented status lines.
///
/// Download progress is redrawn in place with a carriage return.
pub struct Console {
    enabled: bool,
    progress_open: bool,
}

impl Console {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            progress_open: false,
        }
    }

    pub fn render(&mut self, event: &FetchEvent) {
        if !self.enabled {
            return;
        }
        let mut out = io::stdout().lock();
        // Status output is best effort; a closed stdout must not abort the install.
        let _ = self.write_event(&mut out, event);
        let _ = out.flush();
    }

    pub fn installed(&mut self, paths: &[PathBuf]) {
        if !self.enabled {
            return;
        }
        for path in paths {
            println!("\t - installed '{}'.", path.display());
        }
    }

    fn write_event<W: Write>(&mut self, out: &mut W, event: &FetchEvent) -> io::Result<()> {
        match event {
            FetchEvent::VersionResolved { version } => {
                writeln!(out, "\t - latest chromedriver version is {}.", version)
            }
            FetchEvent::CacheFound { file_name, path } => writeln!(
                out,
                "\t - requested file '{}' found at '{}'.",
                file_name,
                path.display()
            ),
            FetchEvent::CacheValid { path } => {
                writeln!(out, "\t - cached file '{}' is valid.", path.display())
            }
            FetchEvent::CacheInvalid { path } => {
                writeln!(out, "\t - cached file '{}' is not valid!", path.display())
            }
            FetchEvent::DownloadStarted { .. } => {
                self.progress_open = false;
                Ok(())
            }
            FetchEvent::DownloadProgress {
                url,
                dest,
                progress,
            } => {
                self.progress_open = true;
                let percent = progress
                    .whole_percent()
                    .map_or_else(|| format!("{} bytes", progress.bytes_downloaded), |p| format!("{}%", p));
                write!(
                    out,
                    "\r\t - downloading from '{}' to '{}' [{}]",
                    url,
                    dest.display(),
                    percent
                )?;
                if progress.is_complete() {
                    write!(out, " OK")?;
                }
                Ok(())
            }
            FetchEvent::DownloadFinished { complete } => {
                if self.progress_open {
                    writeln!(out)?;
                    self.progress_open = false;
                }
                if !complete {
                    writeln!(out, "\t - download failed!")?;
                }
                Ok(())
            }
            FetchEvent::Extracting { archive, dest } => writeln!(
                out,
                "\t - extracting '{}' to '{}'.",
                archive.display(),
                dest.display()
            ),
        }
    }
}
