//! Deletion of selected duplicate files.
//!
//! # Overview
//!
//! Files are addressed only through an [`AddressTable`] index. The caller
//! hands over a set of 0-based indices; every index present in the table is
//! removed and credited with the size recorded at scan time. Indices that
//! are not in the table are skipped without error.
//!
//! Removal is permanent by default. With [`DeleteConfig::use_trash`] files
//! are moved to the system trash instead.
//!
//! Each file is independent: a failure is logged and recorded, and the
//! remaining files are still attempted. There is no rollback.
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::actions::delete::{delete_selected, DeleteConfig, NoProgress};
//! use dupfinder::duplicates::{AddressTable, DuplicateSet};
//! use std::collections::BTreeSet;
//!
//! let table = AddressTable::build(&DuplicateSet::default());
//! let selection: BTreeSet<usize> = [1, 3].into_iter().collect();
//!
//! let result = delete_selected::<NoProgress>(&table, &selection, &DeleteConfig::default(), None);
//! println!("{}", result.summary());
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::duplicates::AddressTable;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    fn from_io(path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: e,
            },
        }
    }

    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::TrashFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// Result of a successful deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Address table index of the file.
    pub index: usize,
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size credited, as recorded in the address table.
    pub size: u64,
    /// Whether the file went to the trash (true) or was removed (false).
    pub trashed: bool,
}

/// A selected file that could not be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    /// Address table index of the file.
    pub index: usize,
    /// Path that could not be deleted.
    pub path: PathBuf,
    /// Error message.
    pub message: String,
}

/// Results of a batch deletion.
#[derive(Debug, Clone, Default)]
pub struct BatchDeleteResult {
    /// Successfully deleted files, in index order.
    pub successes: Vec<DeleteResult>,
    /// Failed deletions, in index order.
    pub failures: Vec<DeleteFailure>,
    /// Selected indices with no entry in the address table.
    pub skipped: Vec<usize>,
    /// Total bytes freed.
    pub bytes_freed: u64,
}

impl BatchDeleteResult {
    /// Number of successful deletions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if all attempted deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Deleted {} file(s), freed {} bytes",
                self.success_count(),
                self.bytes_freed
            )
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {} bytes",
                self.success_count(),
                self.failure_count(),
                self.bytes_freed
            )
        }
    }
}

/// Configuration for deletion operations.
#[derive(Debug, Clone, Default)]
pub struct DeleteConfig {
    /// Move files to the system trash instead of removing them.
    pub use_trash: bool,
}

impl DeleteConfig {
    /// Create config for permanent removal.
    #[must_use]
    pub fn permanent() -> Self {
        Self::default()
    }

    /// Create config for moving to the trash.
    #[must_use]
    pub fn trash() -> Self {
        Self { use_trash: true }
    }
}

/// Callback trait for deletion progress reporting.
pub trait DeleteProgressCallback {
    /// Called before each file deletion.
    fn on_before_delete(&self, path: &Path, index: usize);

    /// Called after successful deletion.
    fn on_delete_success(&self, path: &Path, size: u64);

    /// Called after failed deletion.
    fn on_delete_failure(&self, path: &Path, error: &str);
}

/// Callback that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl DeleteProgressCallback for NoProgress {
    fn on_before_delete(&self, _: &Path, _: usize) {}
    fn on_delete_success(&self, _: &Path, _: u64) {}
    fn on_delete_failure(&self, _: &Path, _: &str) {}
}

/// Permanently remove a single file.
///
/// # Errors
///
/// Returns [`DeleteError`] when the file is missing, protected or cannot
/// be removed.
pub fn permanent_delete(path: &Path) -> Result<(), DeleteError> {
    fs::remove_file(path).map_err(|e| {
        log::error!("Permanent delete failed for {}: {}", path.display(), e);
        DeleteError::from_io(path, e)
    })?;
    log::info!("Permanently deleted: {}", path.display());
    Ok(())
}

/// Move a single file to the system trash.
///
/// # Errors
///
/// Returns [`DeleteError::NotFound`] if the file is gone, otherwise
/// [`DeleteError::TrashFailed`] when the trash backend refuses it.
pub fn delete_to_trash(path: &Path) -> Result<(), DeleteError> {
    fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;

    trash::delete(path).map_err(|e| {
        log::error!("Trash operation failed for {}: {}", path.display(), e);
        DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;
    log::info!("Moved to trash: {}", path.display());
    Ok(())
}

/// Delete every selected address.
///
/// Indices are processed in ascending order. Each deleted file is credited
/// with the size recorded in `table`, so the total for k files of size s is
/// exactly k·s. Indices not in the table are listed in
/// [`BatchDeleteResult::skipped`]. A failure never stops the batch.
pub fn delete_selected<C: DeleteProgressCallback>(
    table: &AddressTable,
    selection: &BTreeSet<usize>,
    config: &DeleteConfig,
    callback: Option<&C>,
) -> BatchDeleteResult {
    let mut result = BatchDeleteResult::default();

    for &index in selection {
        let Some(address) = table.get(index) else {
            log::debug!("Ignoring index {} outside the address table", index);
            result.skipped.push(index);
            continue;
        };
        let path = address.path.as_path();

        if let Some(cb) = callback {
            cb.on_before_delete(path, index);
        }

        let outcome = if config.use_trash {
            delete_to_trash(path)
        } else {
            permanent_delete(path)
        };

        match outcome {
            Ok(()) => {
                result.bytes_freed += address.size;
                if let Some(cb) = callback {
                    cb.on_delete_success(path, address.size);
                }
                result.successes.push(DeleteResult {
                    index,
                    path: path.to_path_buf(),
                    size: address.size,
                    trashed: config.use_trash,
                });
            }
            Err(e) => {
                let message = e.to_string();
                log::warn!("Failed to delete {}: {}", path.display(), message);
                if let Some(cb) = callback {
                    cb.on_delete_failure(path, &message);
                }
                result.failures.push(DeleteFailure {
                    index,
                    path: path.to_path_buf(),
                    message,
                });
            }
        }
    }

    log::info!("{}", result.summary());
    result
}
