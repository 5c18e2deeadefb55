//! Output formatters for scan and detection results.
//!
//! - Plain text listings for the interactive session (this module)
//! - JSON for automation and scripting ([`json`])
//!
//! The text listings number duplicate files from 1 in the same traversal
//! order the [`AddressTable`](crate::duplicates::AddressTable) uses, so the
//! number a user types maps straight back to a table index.
//!
//! # Example
//!
//! ```
//! use dupfinder::duplicates::{group_by_size, SortOrder};
//! use dupfinder::output::write_size_listing;
//! use dupfinder::scanner::FileRecord;
//!
//! let (buckets, _) = group_by_size(vec![
//!     FileRecord::new("/a", 10),
//!     FileRecord::new("/b", 10),
//! ]);
//!
//! let mut out = Vec::new();
//! write_size_listing(&mut out, &buckets, SortOrder::Descending).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "\n10 bytes\n/a\n/b\n");
//! ```

pub mod json;

use std::io::{self, Write};

use bytesize::ByteSize;

use crate::duplicates::{DuplicateSet, HashStats, SizeBuckets, SortOrder};

pub use json::{JsonOutput, JsonOutputError};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Interactive session with text listings
    #[default]
    Text,
    /// Non-interactive JSON report
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// List every size bucket with its member paths.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_size_listing<W: Write>(
    writer: &mut W,
    buckets: &SizeBuckets,
    order: SortOrder,
) -> io::Result<()> {
    for (size, records) in buckets.iter_ordered(order) {
        writeln!(writer)?;
        writeln!(writer, "{size} bytes")?;
        for record in records {
            writeln!(writer, "{}", record.path.display())?;
        }
    }
    Ok(())
}

/// List confirmed duplicates with their digest and a running number.
///
/// Returns how many files were numbered.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_duplicate_listing<W: Write>(
    writer: &mut W,
    duplicates: &DuplicateSet,
) -> io::Result<usize> {
    let mut number = 0;
    for entry in duplicates.entries() {
        writeln!(writer)?;
        writeln!(writer, "{} bytes", entry.size)?;
        for group in &entry.groups {
            writeln!(writer, "Hash: {}", group.digest)?;
            for path in &group.paths {
                number += 1;
                writeln!(writer, "{number}. {}", path.display())?;
            }
        }
    }
    Ok(number)
}

/// One-line summary of the digest stage.
#[must_use]
pub fn detection_summary(stats: &HashStats) -> String {
    if stats.duplicate_groups == 0 {
        return "No duplicate files found".to_string();
    }
    format!(
        "{} duplicate files in {} groups, {} reclaimable",
        stats.duplicate_files,
        stats.duplicate_groups,
        ByteSize::b(stats.reclaimable_bytes)
    )
}

/// Report the bytes reclaimed by a deletion.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_freed<W: Write>(writer: &mut W, bytes: u64) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "Total freed up space: {bytes} bytes")
}
