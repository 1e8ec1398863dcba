use crate::error::{Result, SheetcolsError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

/// Summary of a finished export, used for console reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub workbook: PathBuf,
    pub output: PathBuf,
    pub first_non_empty_only: bool,
    pub sheets: Vec<SheetSummary>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetSummary {
    pub name: String,
    pub headers: Vec<String>,
    /// Requested headers that the sheet does not have.
    pub missing_headers: Vec<String>,
    pub rows_scanned: usize,
    pub lines_written: usize,
}

impl ExportReport {
    pub fn total_lines(&self) -> usize {
        self.sheets.iter().map(|s| s.lines_written).sum()
    }
}

/// Symlink hops followed before the output path is rejected.
const MAX_LINK_DEPTH: usize = 32;

/// Output file written through a temporary sibling and renamed into place on
/// `commit`. Dropping it without committing leaves the target untouched.
///
/// A symlinked output path is resolved first, so the file it points to is
/// replaced and the link survives. The replacement keeps the permissions of
/// the file it replaces; a new file gets the same mode a plain create would.
pub struct OutputManager {
    target: PathBuf,
    writer: BufWriter<NamedTempFile>,
}

impl OutputManager {
    pub fn create<P: AsRef<Path>>(target: P) -> Result<Self> {
        let target = resolve_symlinks(target.as_ref())?;
        validate_output_path(&target)?;

        let parent = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if !parent.is_dir() {
            return Err(SheetcolsError::InvalidPath {
                path: format!("Output directory does not exist: {}", parent.display()),
            });
        }

        let temp = new_temp_file(&parent)?;
        if let Ok(metadata) = fs::metadata(&target) {
            temp.as_file().set_permissions(metadata.permissions())?;
        }
        tracing::debug!(temp = %temp.path().display(), target = %target.display(), "opened output");

        Ok(Self {
            target,
            writer: BufWriter::new(temp),
        })
    }

    pub fn writer(&mut self) -> &mut BufWriter<NamedTempFile> {
        &mut self.writer
    }

    /// Flushes and atomically replaces the target with the written content.
    pub fn commit(self) -> Result<()> {
        let temp = self
            .writer
            .into_inner()
            .map_err(|e| SheetcolsError::Io(e.into_error()))?;

        temp.as_file().sync_all()?;
        temp.persist(&self.target).map_err(|e| SheetcolsError::Io(e.error))?;
        Ok(())
    }
}

fn resolve_symlinks(path: &Path) -> Result<PathBuf> {
    let mut resolved = path.to_path_buf();

    for _ in 0..MAX_LINK_DEPTH {
        match fs::symlink_metadata(&resolved) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                let link = fs::read_link(&resolved)?;
                resolved = match resolved.parent() {
                    Some(parent) => parent.join(link),
                    None => link,
                };
            }
            _ => return Ok(resolved),
        }
    }

    Err(SheetcolsError::InvalidPath {
        path: format!("Too many levels of symbolic links: {}", path.display()),
    })
}

#[cfg(unix)]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    // 0666 before the umask, as `File::create` does.
    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}

fn validate_output_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(SheetcolsError::InvalidPath {
            path: "No output file given".to_string(),
        });
    }

    if path.is_dir() {
        return Err(SheetcolsError::InvalidPath {
            path: format!("Output path is a directory: {}", path.display()),
        });
    }

    if let Ok(metadata) = fs::metadata(path) {
        if metadata.permissions().readonly() {
            return Err(SheetcolsError::InvalidPath {
                path: format!("Output file is read-only: {}", path.display()),
            });
        }
    }

    Ok(())
}
