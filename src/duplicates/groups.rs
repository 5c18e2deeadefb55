//! Size-based file grouping.
//!
//! # Overview
//!
//! Size grouping is the first filter of duplicate detection. Two files can
//! only be byte-identical if they have the same size, so files with a unique
//! size are dropped before any content is read. This bounds the number of
//! files that are ever hashed.
//!
//! # Example
//!
//! ```
//! use dupfinder::scanner::FileRecord;
//! use dupfinder::duplicates::group_by_size;
//!
//! let files = vec![
//!     FileRecord::new("/file1.txt", 1024),
//!     FileRecord::new("/file2.txt", 1024),
//!     FileRecord::new("/file3.txt", 2048),
//! ];
//!
//! let (buckets, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(buckets.len(), 1);
//! ```

use std::collections::BTreeMap;

use super::SortOrder;
use crate::scanner::FileRecord;

/// Files grouped by exact byte size.
///
/// Every retained bucket holds at least two records. Inside a bucket the
/// records keep the order the scanner discovered them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeBuckets {
    buckets: BTreeMap<u64, Vec<FileRecord>>,
}

impl SizeBuckets {
    /// Number of retained size buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// True when no size is shared by two or more files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Records sharing `size`, if that bucket survived.
    #[must_use]
    pub fn get(&self, size: u64) -> Option<&[FileRecord]> {
        self.buckets.get(&size).map(Vec::as_slice)
    }

    /// Total number of records across all buckets.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Buckets in the requested size order.
    pub fn iter_ordered(
        &self,
        order: SortOrder,
    ) -> Box<dyn Iterator<Item = (u64, &[FileRecord])> + '_> {
        let iter = self
            .buckets
            .iter()
            .map(|(size, records)| (*size, records.as_slice()));
        match order {
            SortOrder::Ascending => Box::new(iter),
            SortOrder::Descending => Box::new(iter.rev()),
        }
    }
}

/// Statistics from size grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct file sizes seen
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in buckets of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated because nothing else had their size
    pub eliminated_unique: usize,
    /// Number of size buckets with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size, dropping sizes held by a single file.
///
/// # Performance
///
/// O(n) in the number of records. No file I/O is performed.
///
/// # Example
///
/// ```
/// use dupfinder::scanner::FileRecord;
/// use dupfinder::duplicates::group_by_size;
///
/// let files = vec![
///     FileRecord::new("/a.txt", 100),
///     FileRecord::new("/b.txt", 100),
///     FileRecord::new("/c.txt", 200),
/// ];
///
/// let (buckets, stats) = group_by_size(files);
///
/// assert_eq!(buckets.get(100).unwrap().len(), 2);
/// assert!(buckets.get(200).is_none());
/// assert_eq!(stats.eliminated_unique, 1);
/// ```
#[must_use]
pub fn group_by_size(
    records: impl IntoIterator<Item = FileRecord>,
) -> (SizeBuckets, GroupingStats) {
    let mut all: BTreeMap<u64, Vec<FileRecord>> = BTreeMap::new();
    let mut stats = GroupingStats::default();

    for record in records {
        stats.total_files += 1;
        stats.total_size += record.size;
        all.entry(record.size).or_default().push(record);
    }

    stats.unique_sizes = all.len();

    all.retain(|size, records| {
        if records.len() < 2 {
            stats.eliminated_unique += records.len();
            log::trace!(
                "Eliminated unique size {}: {}",
                size,
                records[0].path.display()
            );
            false
        } else {
            stats.potential_duplicates += records.len();
            stats.duplicate_groups += 1;
            log::debug!(
                "Size group {} bytes: {} potential duplicates",
                size,
                records.len()
            );
            true
        }
    });

    log::info!(
        "Size grouping complete: {} files → {} potential duplicates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (SizeBuckets { buckets: all }, stats)
}
