//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (first filter, no I/O)
//! - Full-content digest grouping within each size bucket
//! - The ordered [`DuplicateSet`] and its dense [`AddressTable`]

pub mod finder;
pub mod groups;
pub mod index;

pub use finder::{
    build_duplicate_set, group_by_digest, group_hashed, DigestGroups, DigestOutcome,
    DuplicateFinder, FinderConfig, FinderError, HashStats, ScanReport,
};
pub use groups::{group_by_size, GroupingStats, SizeBuckets};
pub use index::{Address, AddressTable, DigestGroup, DuplicateSet, SizeEntry, SortOrder};
