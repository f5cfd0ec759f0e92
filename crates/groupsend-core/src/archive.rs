//! Archiving of sent files.
//!
//! After a successful send, a group's files move into the archive
//! subfolder. A failure partway leaves earlier moves in place; the caller
//! logs and carries on, since the message itself is already delivered.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the archive subfolder expected next to the source files.
pub const ARCHIVE_SUBFOLDER: &str = "old";

/// A file move failed.
#[derive(Debug, thiserror::Error)]
#[error("Failed to move {} to archive: {source}", .path.display())]
pub struct ArchiveError {
    /// File that could not be moved.
    pub path: PathBuf,
    /// Underlying I/O error.
    pub source: std::io::Error,
}

/// Moves each file into `dest_dir`, keeping its base name.
///
/// Stops at the first failure; files already moved stay moved. A missing
/// destination directory surfaces as the first move failure.
///
/// # Errors
///
/// Returns [`ArchiveError`] naming the file whose move failed.
pub fn archive_files<P: AsRef<Path>>(files: &[P], dest_dir: &Path) -> Result<(), ArchiveError> {
    for file in files {
        let file = file.as_ref();
        let name = file.file_name().unwrap_or(file.as_os_str());
        let target = dest_dir.join(name);

        fs::rename(file, &target).map_err(|source| ArchiveError {
            path: file.to_path_buf(),
            source,
        })?;
        debug!(from = %file.display(), to = %target.display(), "Archived file");
    }

    Ok(())
}
