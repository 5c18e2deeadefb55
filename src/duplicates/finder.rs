//! Duplicate finder implementation.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Walk** - collect candidate files (see [`crate::scanner`])
//! 2. **Size grouping** - drop files with a unique size (see [`super::groups`])
//! 3. **Digest grouping** - hash every remaining file and group equal digests
//! 4. **Assembly** - lay the groups out in the run's [`SortOrder`] as a
//!    [`DuplicateSet`]
//!
//! Hashing runs on a bounded rayon pool. Results are collected in input
//! order and grouped only once every hash is known, so the output never
//! depends on which worker finished first.
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::duplicates::{AddressTable, DuplicateFinder, FinderConfig, SortOrder};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(4));
//! let report = finder.scan(Path::new("/some/path")).unwrap();
//! let (duplicates, stats) = finder.detect(&report.buckets, SortOrder::Descending);
//!
//! let table = AddressTable::build(&duplicates);
//! println!("{} groups, {} addressable files", stats.duplicate_groups, table.len());
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use rayon::prelude::*;

use super::groups::{group_by_size, GroupingStats, SizeBuckets};
use super::index::{DigestGroup, DuplicateSet, SizeEntry, SortOrder};
use crate::progress::ProgressCallback;
use crate::scanner::{
    walker::scan_with, ContentDigest, Digest, FileRecord, HashError, Hasher, ScanError, Walker,
    WalkerConfig,
};

/// Paths of one size bucket grouped by digest, in first-seen order.
pub type DigestGroups = IndexMap<Digest, Vec<PathBuf>>;

/// Result of grouping one size bucket by digest.
#[derive(Debug, Default)]
pub struct DigestOutcome {
    /// Groups with 2+ paths
    pub groups: DigestGroups,
    /// Files that could not be read and were left unclassified
    pub errors: Vec<HashError>,
}

/// Group already-hashed records by digest, dropping singleton groups.
///
/// `digests[i]` must be the hash result for `records[i]`. Records whose
/// hash failed are excluded from grouping and reported in
/// [`DigestOutcome::errors`]; the rest of the bucket is unaffected.
#[must_use]
pub fn group_hashed(
    records: &[FileRecord],
    digests: Vec<Result<Digest, HashError>>,
) -> DigestOutcome {
    debug_assert_eq!(records.len(), digests.len());

    let mut outcome = DigestOutcome::default();
    for (record, digest) in records.iter().zip(digests) {
        match digest {
            Ok(digest) => outcome
                .groups
                .entry(digest)
                .or_default()
                .push(record.path.clone()),
            Err(e) => outcome.errors.push(e),
        }
    }

    outcome.groups.retain(|digest, paths| {
        if paths.len() < 2 {
            log::trace!("Eliminated unique digest {}: {}", digest, paths[0].display());
            false
        } else {
            true
        }
    });
    outcome
}

/// Hash every record of one size bucket and group equal digests.
///
/// This is the single-bucket, single-threaded form of the digest stage.
///
/// # Example
///
/// ```no_run
/// use dupfinder::duplicates::group_by_digest;
/// use dupfinder::scanner::{FileRecord, Hasher};
///
/// let bucket = vec![FileRecord::new("/a", 3), FileRecord::new("/b", 3)];
/// let outcome = group_by_digest(&bucket, &Hasher::new());
/// for (digest, paths) in &outcome.groups {
///     println!("{digest}: {paths:?}");
/// }
/// ```
#[must_use]
pub fn group_by_digest(records: &[FileRecord], digester: &dyn ContentDigest) -> DigestOutcome {
    let digests = records
        .iter()
        .map(|record| digester.digest(&record.path))
        .collect();
    group_hashed(records, digests)
}

/// Statistics from the digest stage.
#[derive(Debug, Default)]
pub struct HashStats {
    /// Files that entered the digest stage
    pub input_files: usize,
    /// Files successfully hashed
    pub hashed_files: usize,
    /// Files that could not be read
    pub failed_files: usize,
    /// Errors for the files that could not be read
    pub errors: Vec<HashError>,
    /// Total bytes hashed
    pub bytes_hashed: u64,
    /// Confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Files in confirmed groups, originals included
    pub duplicate_files: usize,
    /// Bytes freed if every group kept exactly one copy
    pub reclaimable_bytes: u64,
}

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of threads used for hashing.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("walker_config", &self.walker_config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            walker_config: WalkerConfig::default(),
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the number of hashing threads (at least 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Hash all `records` on a pool of `io_threads` workers.
///
/// The returned vector is index-aligned with `records` regardless of the
/// order in which workers complete.
fn hash_all(
    records: &[&FileRecord],
    digester: &dyn ContentDigest,
    config: &FinderConfig,
) -> Vec<Result<Digest, HashError>> {
    let run = || -> Vec<Result<Digest, HashError>> {
        records
            .par_iter()
            .map(|record| {
                if let Some(ref callback) = config.progress_callback {
                    callback.on_progress(&record.path.to_string_lossy());
                }
                let result = digester.digest(&record.path);
                match &result {
                    Ok(_) => {
                        log::trace!("Hash computed: {}", record.path.display());
                        if let Some(ref callback) = config.progress_callback {
                            callback.on_item_completed(record.size);
                        }
                    }
                    Err(e) => log::warn!("Failed to hash {}: {}", record.path.display(), e),
                }
                result
            })
            .collect()
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(config.io_threads)
        .build()
    {
        Ok(pool) => pool.install(run),
        Err(e) => {
            log::warn!(
                "Failed to create hashing pool ({}), using global pool with {} threads",
                e,
                rayon::current_num_threads()
            );
            run()
        }
    }
}

/// Hash every bucket and assemble the [`DuplicateSet`] in `order`.
///
/// Buckets are visited in `order`; inside a size entry digest groups keep
/// first-seen order and paths keep discovery order. A size entry is kept
/// only when at least one of its digest groups survived.
#[must_use]
pub fn build_duplicate_set(
    buckets: &SizeBuckets,
    digester: &dyn ContentDigest,
    order: SortOrder,
    config: &FinderConfig,
) -> (DuplicateSet, HashStats) {
    let ordered: Vec<(u64, &[FileRecord])> = buckets.iter_ordered(order).collect();
    let flat: Vec<&FileRecord> = ordered
        .iter()
        .flat_map(|(_, records)| records.iter())
        .collect();

    let mut stats = HashStats {
        input_files: flat.len(),
        ..Default::default()
    };

    if flat.is_empty() {
        log::debug!("Digest stage: No files to process");
        return (DuplicateSet::default(), stats);
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start("hash", flat.len());
    }
    log::info!("Computing full hashes for {} files", flat.len());

    let mut digests = hash_all(&flat, digester, config).into_iter();

    let mut entries = Vec::with_capacity(ordered.len());
    for (size, records) in ordered {
        let bucket_digests: Vec<_> = digests.by_ref().take(records.len()).collect();
        let outcome = group_hashed(records, bucket_digests);

        let failed = outcome.errors.len();
        stats.failed_files += failed;
        stats.hashed_files += records.len() - failed;
        stats.bytes_hashed += size * (records.len() - failed) as u64;
        stats.errors.extend(outcome.errors);

        if outcome.groups.is_empty() {
            continue;
        }

        let groups: Vec<DigestGroup> = outcome
            .groups
            .into_iter()
            .map(|(digest, paths)| {
                log::debug!(
                    "Duplicate group {}: {} files, {} bytes each",
                    digest,
                    paths.len(),
                    size
                );
                DigestGroup { digest, paths }
            })
            .collect();
        entries.push(SizeEntry { size, groups });
    }

    let set = DuplicateSet::from_entries(entries);
    stats.duplicate_groups = set.group_count();
    stats.duplicate_files = set.file_count();
    stats.reclaimable_bytes = set.reclaimable_bytes();

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end("hash");
    }

    log::info!(
        "Digest stage complete: {} groups, {} files, {} bytes reclaimable",
        stats.duplicate_groups,
        stats.duplicate_files,
        stats.reclaimable_bytes
    );

    (set, stats)
}

/// Errors that can occur before a scan starts.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root could not be inspected.
    #[error("I/O error for {path}: {source}")]
    IoWithPath {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Output of walking and size-grouping one tree.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Files sharing a size with at least one other file
    pub buckets: SizeBuckets,
    /// Size grouping statistics
    pub grouping: GroupingStats,
    /// Entries skipped because their metadata could not be read
    pub errors: Vec<ScanError>,
}

/// Duplicate finder that drives the detection pipeline.
///
/// # Example
///
/// ```no_run
/// use dupfinder::duplicates::{DuplicateFinder, SortOrder};
/// use std::path::Path;
///
/// let finder = DuplicateFinder::with_defaults();
/// let (duplicates, stats) = finder
///     .find_duplicates(Path::new("/some/path"), SortOrder::Ascending)
///     .unwrap();
/// println!("{} bytes reclaimable", stats.reclaimable_bytes);
/// ```
pub struct DuplicateFinder {
    config: FinderConfig,
    digester: Arc<dyn ContentDigest>,
}

impl DuplicateFinder {
    /// Create a new duplicate finder hashing with BLAKE3.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            digester: Arc::new(Hasher::new()),
        }
    }

    /// Create a finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Replace the content digester.
    #[must_use]
    pub fn with_digester(mut self, digester: Arc<dyn ContentDigest>) -> Self {
        self.digester = digester;
        self
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Check that `root` exists and is a directory.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::PathNotFound`] or [`FinderError::NotADirectory`].
    pub fn validate_root(root: &Path) -> Result<(), FinderError> {
        match std::fs::metadata(root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(FinderError::NotADirectory(root.to_path_buf())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FinderError::PathNotFound(root.to_path_buf()))
            }
            Err(e) => Err(FinderError::IoWithPath {
                path: root.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Walk `root` and group the files found by size.
    ///
    /// # Errors
    ///
    /// Fails only when `root` itself is missing or not a directory.
    /// Unreadable entries below it are collected in [`ScanReport::errors`].
    pub fn scan(&self, root: &Path) -> Result<ScanReport, FinderError> {
        Self::validate_root(root)?;

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("walk", 0);
        }
        log::info!("Scanning {}", root.display());

        let walker = Walker::new(root, self.config.walker_config.clone());
        let outcome = scan_with(walker);

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("walk");
        }

        let (buckets, grouping) = group_by_size(outcome.records);
        Ok(ScanReport {
            buckets,
            grouping,
            errors: outcome.errors,
        })
    }

    /// Run the digest stage over previously scanned buckets.
    #[must_use]
    pub fn detect(&self, buckets: &SizeBuckets, order: SortOrder) -> (DuplicateSet, HashStats) {
        build_duplicate_set(buckets, self.digester.as_ref(), order, &self.config)
    }

    /// Scan and detect in one call.
    ///
    /// # Errors
    ///
    /// See [`DuplicateFinder::scan`].
    pub fn find_duplicates(
        &self,
        root: &Path,
        order: SortOrder,
    ) -> Result<(DuplicateSet, HashStats), FinderError> {
        let report = self.scan(root)?;
        Ok(self.detect(&report.buckets, order))
    }
}
