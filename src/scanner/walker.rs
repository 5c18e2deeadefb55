//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and collecting [`FileRecord`]s for duplicate detection, plus the
//! [`scan`] convenience function that drains a walk into a [`ScanOutcome`].
//!
//! # Features
//!
//! - Parallel directory reading via jwalk's rayon pool
//! - Children sorted by file name, so discovery order is reproducible
//! - File-name suffix filtering (empty suffix matches everything)
//! - Per-entry error reporting: one unreadable entry never stops the walk
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::scanner::scan;
//! use std::path::Path;
//!
//! let outcome = scan(Path::new("/home/user/Music"), ".flac");
//! println!("{} files, {} errors", outcome.records.len(), outcome.errors.len());
//! ```

use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use super::{FileRecord, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupfinder::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// ```
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Check if a file name passes the suffix filter.
    fn matches_suffix(&self, path: &Path) -> bool {
        if self.config.suffix.is_empty() {
            return true;
        }
        path.file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(&self.config.suffix))
    }

    /// Walk the directory tree, yielding file records.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. Records come out in a stable order: directory by
    /// directory, each directory's children sorted by file name.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupfinder::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
    /// println!("Found {} files", files.len());
    /// ```
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .skip_hidden(false)
            .process_read_dir(|_depth, _path, _read_dir_state, children| {
                // Sort children for deterministic output
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            });

        walk_dir
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        return None;
                    }

                    let path = entry.path();
                    if !self.matches_suffix(&path) {
                        log::trace!("Skipping file due to suffix filter: {}", path.display());
                        return None;
                    }

                    if file_type.is_symlink() && !self.config.follow_symlinks {
                        log::trace!("Skipping symlink: {}", path.display());
                        return None;
                    }

                    self.read_record(path)
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    log::warn!("Walker error for {}: {}", path.display(), e);
                    Some(Err(ScanError::Io {
                        path,
                        source: std::io::Error::other(e.to_string()),
                    }))
                }
            })
    }

    /// Resolve the size of a candidate file at traversal time.
    fn read_record(&self, path: PathBuf) -> Option<Result<FileRecord, ScanError>> {
        let metadata = if self.config.follow_symlinks {
            std::fs::metadata(&path)
        } else {
            std::fs::symlink_metadata(&path)
        };

        match metadata {
            Ok(metadata) if metadata.is_file() => Some(Ok(FileRecord {
                size: metadata.len(),
                path,
            })),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Cannot read metadata for {}: {}", path.display(), e);
                Some(Err(ScanError::from_io(path, e)))
            }
        }
    }
}

/// Everything a completed walk produced.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Included files in discovery order
    pub records: Vec<FileRecord>,
    /// Entries that could not be read and were skipped
    pub errors: Vec<ScanError>,
}

/// Walk `root` and collect every regular file whose name ends with `suffix`.
///
/// Traversal never aborts on a single bad entry; failures are collected in
/// [`ScanOutcome::errors`].
#[must_use]
pub fn scan(root: &Path, suffix: &str) -> ScanOutcome {
    scan_with(Walker::new(root, WalkerConfig::with_suffix(suffix)))
}

/// Drain an already configured walker into a [`ScanOutcome`].
#[must_use]
pub fn scan_with(walker: Walker) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    for entry in walker.walk() {
        match entry {
            Ok(record) => outcome.records.push(record),
            Err(e) => outcome.errors.push(e),
        }
    }
    log::info!(
        "Scan complete: {} files, {} errors",
        outcome.records.len(),
        outcome.errors.len()
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    /// Create a test directory with some files.
    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        let mut f = File::create(dir.path().join("file1.txt")).unwrap();
        writeln!(f, "Hello, world!").unwrap();

        let mut f = File::create(dir.path().join("file2.log")).unwrap();
        writeln!(f, "Another file").unwrap();

        let subdir = dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();

        let mut f = File::create(subdir.join("nested.txt")).unwrap();
        writeln!(f, "Nested file content").unwrap();

        dir
    }

    #[test]
    fn test_walker_finds_files() {
        let dir = create_test_dir();
        let walker = Walker::new(dir.path(), WalkerConfig::default());

        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert_eq!(files.len(), 3);
        for file in &files {
            assert!(file.size > 0);
            assert!(file.path.exists());
        }
    }

    #[test]
    fn test_walker_suffix_filter() {
        let dir = create_test_dir();
        let walker = Walker::new(dir.path(), WalkerConfig::with_suffix(".txt"));

        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert_eq!(files.len(), 2);
        for file in &files {
            assert!(file.path.to_string_lossy().ends_with(".txt"));
        }
    }

    #[test]
    fn test_walker_suffix_matches_whole_name_tail() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("archive.tar.gz"), b"a").unwrap();
        fs::write(dir.path().join("gz"), b"b").unwrap();
        fs::write(dir.path().join("notes.txt"), b"c").unwrap();

        let outcome = scan(dir.path(), "gz");
        let names: Vec<_> = outcome
            .records
            .iter()
            .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["archive.tar.gz", "gz"]);
    }

    #[test]
    fn test_walker_includes_empty_and_hidden_files() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("empty.txt")).unwrap();
        fs::write(dir.path().join(".hidden"), b"secret").unwrap();

        let outcome = scan(dir.path(), "");

        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.records.iter().any(|r| r.size == 0));
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_walker_order_is_deterministic() {
        let dir = TempDir::new().unwrap();
        for name in ["c.bin", "a.bin", "b.bin"] {
            fs::write(dir.path().join(name), b"same").unwrap();
        }

        let first = scan(dir.path(), "").records;
        let second = scan(dir.path(), "").records;

        assert_eq!(first, second);
        let names: Vec<_> = first
            .iter()
            .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.bin", "b.bin", "c.bin"]);
    }

    #[test]
    fn test_walker_handles_nonexistent_path() {
        let walker = Walker::new(
            Path::new("/nonexistent/path/12345"),
            WalkerConfig::default(),
        );

        let results: Vec<_> = walker.walk().collect();

        // Should produce errors, not panic
        assert!(results.is_empty() || results.iter().all(|r| r.is_err()));
    }

    #[test]
    #[cfg(unix)]
    fn test_walker_skips_broken_symlink_without_aborting() {
        let dir = create_test_dir();
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling.txt"))
            .unwrap();

        let outcome = scan(dir.path(), ".txt");

        // The dangling link is not followed, so it is silently skipped
        assert_eq!(outcome.records.len(), 2);
    }

    #[test]
    #[cfg(unix)]
    fn test_walker_reports_broken_symlink_when_following() {
        let dir = create_test_dir();
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling.txt"))
            .unwrap();

        let walker = Walker::new(
            dir.path(),
            WalkerConfig::with_suffix(".txt").follow_symlinks(true),
        );
        let outcome = scan_with(walker);

        // Siblings are still visited; the dangling link never becomes a record
        assert_eq!(outcome.records.len(), 2);
        assert!(outcome
            .records
            .iter()
            .all(|r| !r.path.ends_with("dangling.txt")));
    }
}
