//! Command-line interface definitions for dupfinder.
//!
//! This module defines all CLI arguments and options using the clap derive
//! API. Most options can also be set in the config file or through
//! `DUPFINDER_*` environment variables; flags given here win.
//!
//! # Example
//!
//! ```bash
//! # Fully interactive session
//! dupfinder ~/Music
//!
//! # Pre-answer the suffix, order and detection prompts
//! dupfinder ~/Music --suffix .flac --order asc --check
//!
//! # Non-interactive JSON report for scripting
//! dupfinder ~/Music --output json
//!
//! # Verbose mode for debugging
//! dupfinder -v ~/Music
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::duplicates::SortOrder;
use crate::output::OutputFormat;

/// Find duplicate files in a directory tree and delete the ones you pick.
///
/// Files are first grouped by size, then confirmed by BLAKE3 content hash.
/// Duplicates are listed with a number; deletion takes those numbers.
#[derive(Debug, Parser)]
#[command(name = "dupfinder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the listings
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory to search for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Only consider files whose name ends with this suffix (skips the prompt)
    ///
    /// An empty value matches every file.
    #[arg(short, long, value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Size sort direction (skips the prompt)
    #[arg(long, value_enum, value_name = "ORDER")]
    pub order: Option<SortOrder>,

    /// Run duplicate detection without asking first
    #[arg(long)]
    pub check: bool,

    /// Number of I/O threads for hashing (default: 4)
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub io_threads: Option<u16>,

    /// Follow symbolic links during scan
    ///
    /// Warning: May cause infinite loops if symlinks form cycles.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Move deleted files to the system trash instead of removing them
    #[arg(long)]
    pub trash: bool,

    /// Output format (text for the interactive session, json for scripting)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
