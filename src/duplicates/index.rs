//! Confirmed duplicates and the address table built over them.
//!
//! A [`DuplicateSet`] is the canonical result of detection: size entries in
//! the run's [`SortOrder`], each holding digest groups in first-seen order,
//! each holding paths in discovery order. [`AddressTable`] flattens that
//! structure into dense 0-based indices, which are the only handle the
//! deletion step accepts.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::scanner::Digest;

/// Direction in which size buckets are traversed and listed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Largest files first
    #[default]
    #[serde(alias = "desc")]
    #[value(alias = "desc")]
    Descending,
    /// Smallest files first
    #[serde(alias = "asc")]
    #[value(alias = "asc")]
    Ascending,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Descending => write!(f, "descending"),
            Self::Ascending => write!(f, "ascending"),
        }
    }
}

/// Files within one size bucket that share a digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestGroup {
    /// Content digest shared by every path
    pub digest: Digest,
    /// Paths in discovery order (always 2 or more)
    pub paths: Vec<PathBuf>,
}

/// All confirmed duplicate groups of one file size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeEntry {
    /// Size in bytes of every file below
    pub size: u64,
    /// Digest groups in first-seen order (never empty)
    pub groups: Vec<DigestGroup>,
}

impl SizeEntry {
    /// Number of files across this entry's groups.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(|g| g.paths.len()).sum()
    }
}

/// Two-level duplicate structure: size → digest → paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DuplicateSet {
    entries: Vec<SizeEntry>,
}

impl DuplicateSet {
    /// Build a set from entries already in traversal order.
    ///
    /// Entries without groups are dropped.
    #[must_use]
    pub fn from_entries(entries: Vec<SizeEntry>) -> Self {
        Self {
            entries: entries.into_iter().filter(|e| !e.groups.is_empty()).collect(),
        }
    }

    /// Size entries in traversal order.
    #[must_use]
    pub fn entries(&self) -> &[SizeEntry] {
        &self.entries
    }

    /// Sizes in traversal order.
    pub fn sizes(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().map(|e| e.size)
    }

    /// True when no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of digest groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.entries.iter().map(|e| e.groups.len()).sum()
    }

    /// Total number of duplicate files, originals included.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.entries.iter().map(SizeEntry::file_count).sum()
    }

    /// Bytes freed if every group were reduced to one copy.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.entries
            .iter()
            .flat_map(|e| e.groups.iter().map(move |g| (e.size, g.paths.len())))
            .map(|(size, count)| size * (count as u64).saturating_sub(1))
            .sum()
    }
}

/// One addressable duplicate file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    /// Path of the file
    pub path: PathBuf,
    /// Size recorded at scan time
    pub size: u64,
}

/// Dense index → (path, size) table over a [`DuplicateSet`].
///
/// Indices are 0-based and assigned in the set's traversal order, so the
/// same tree and the same sort order always produce the same table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressTable {
    entries: Vec<Address>,
}

impl AddressTable {
    /// Flatten a duplicate set into an address table.
    ///
    /// # Example
    ///
    /// ```
    /// use dupfinder::duplicates::{AddressTable, DigestGroup, DuplicateSet, SizeEntry};
    /// use dupfinder::scanner::Hasher;
    /// use std::path::PathBuf;
    ///
    /// let set = DuplicateSet::from_entries(vec![SizeEntry {
    ///     size: 100,
    ///     groups: vec![DigestGroup {
    ///         digest: Hasher::hash_bytes(b"x"),
    ///         paths: vec![PathBuf::from("/a"), PathBuf::from("/b")],
    ///     }],
    /// }]);
    ///
    /// let table = AddressTable::build(&set);
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.get(1).unwrap().path, PathBuf::from("/b"));
    /// ```
    #[must_use]
    pub fn build(set: &DuplicateSet) -> Self {
        let entries = set
            .entries()
            .iter()
            .flat_map(|entry| {
                entry.groups.iter().flat_map(move |group| {
                    group.paths.iter().map(move |path| Address {
                        path: path.clone(),
                        size: entry.size,
                    })
                })
            })
            .collect();
        Self { entries }
    }

    /// Number of addressable files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there is nothing to select.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Address at a 0-based index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Address> {
        self.entries.get(index)
    }

    /// Path at a 0-based index.
    #[must_use]
    pub fn path(&self, index: usize) -> Option<&Path> {
        self.get(index).map(|a| a.path.as_path())
    }

    /// All addresses with their 0-based index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Address)> {
        self.entries.iter().enumerate()
    }

    /// Sum of recorded sizes for the selected indices present in the table.
    #[must_use]
    pub fn selected_bytes(&self, selection: &BTreeSet<usize>) -> u64 {
        selection
            .iter()
            .filter_map(|&i| self.get(i))
            .map(|a| a.size)
            .sum()
    }
}
