//! JSON output formatter for detection results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "sort_order": "descending",
//!   "duplicates": [
//!     {
//!       "size": 1024,
//!       "groups": [
//!         {
//!           "hash": "abc123...",
//!           "files": [
//!             { "number": 1, "path": "/path/to/file1.txt" },
//!             { "number": 2, "path": "/path/to/file2.txt" }
//!           ]
//!         }
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 100,
//!     "total_size": 1048576,
//!     "potential_duplicates": 12,
//!     "duplicate_groups": 5,
//!     "duplicate_files": 10,
//!     "reclaimable_space": 51200,
//!     "scan_errors": 0,
//!     "hash_errors": 0,
//!     "exit_code": 0,
//!     "exit_code_name": "DF000"
//!   }
//! }
//! ```
//!
//! `number` is the same 1-based number the interactive listing shows.

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicateSet, GroupingStats, HashStats, SortOrder};
use crate::error::ExitCode;

/// A numbered duplicate file.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFile {
    /// 1-based listing number
    pub number: usize,
    /// Path as scanned
    pub path: String,
}

/// Files sharing one digest.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDigestGroup {
    /// BLAKE3 hash as hexadecimal string (64 characters)
    pub hash: String,
    /// Duplicate files in discovery order
    pub files: Vec<JsonFile>,
}

/// All duplicate groups of one size.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSizeEntry {
    /// File size in bytes
    pub size: u64,
    /// Digest groups in first-seen order
    pub groups: Vec<JsonDigestGroup>,
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Total number of files scanned
    pub total_files: usize,
    /// Total size of all scanned files in bytes
    pub total_size: u64,
    /// Files that shared a size with another file
    pub potential_duplicates: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of files in duplicate groups
    pub duplicate_files: usize,
    /// Bytes reclaimable by keeping one copy per group
    pub reclaimable_space: u64,
    /// Entries skipped during the walk
    pub scan_errors: usize,
    /// Files that could not be hashed
    pub hash_errors: usize,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DF000")
    pub exit_code_name: String,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Direction sizes are listed in
    pub sort_order: SortOrder,
    /// Duplicates grouped by size then digest
    pub duplicates: Vec<JsonSizeEntry>,
    /// Run statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the report for one detection run.
    ///
    /// # Example
    ///
    /// ```
    /// use dupfinder::duplicates::{DuplicateSet, GroupingStats, HashStats, SortOrder};
    /// use dupfinder::error::ExitCode;
    /// use dupfinder::output::json::JsonOutput;
    ///
    /// let output = JsonOutput::new(
    ///     &DuplicateSet::default(),
    ///     SortOrder::Descending,
    ///     &GroupingStats::default(),
    ///     &HashStats::default(),
    ///     0,
    ///     ExitCode::NoDuplicates,
    /// );
    /// assert!(output.duplicates.is_empty());
    /// assert_eq!(output.summary.exit_code, 2);
    /// ```
    #[must_use]
    pub fn new(
        duplicates: &DuplicateSet,
        sort_order: SortOrder,
        grouping: &GroupingStats,
        hashing: &HashStats,
        scan_errors: usize,
        exit_code: ExitCode,
    ) -> Self {
        let mut number = 0;
        let entries = duplicates
            .entries()
            .iter()
            .map(|entry| JsonSizeEntry {
                size: entry.size,
                groups: entry
                    .groups
                    .iter()
                    .map(|group| JsonDigestGroup {
                        hash: group.digest.to_hex(),
                        files: group
                            .paths
                            .iter()
                            .map(|path| {
                                number += 1;
                                JsonFile {
                                    number,
                                    path: path.to_string_lossy().into_owned(),
                                }
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            sort_order,
            duplicates: entries,
            summary: JsonSummary {
                total_files: grouping.total_files,
                total_size: grouping.total_size,
                potential_duplicates: grouping.potential_duplicates,
                duplicate_groups: hashing.duplicate_groups,
                duplicate_files: hashing.duplicate_files,
                reclaimable_space: hashing.reclaimable_bytes,
                scan_errors,
                hash_errors: hashing.failed_files,
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix().to_string(),
            },
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
