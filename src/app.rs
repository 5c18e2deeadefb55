//! The interactive duplicate-finding session.
//!
//! A [`Session`] walks through the steps in a fixed order:
//!
//! 1. file-name suffix
//! 2. size sort direction
//! 3. scan, then list every file that shares its size with another
//! 4. "Check for duplicates?"
//! 5. hash and list confirmed duplicates, numbered from 1
//! 6. "Delete files?"
//! 7. which numbers to delete
//! 8. delete and report the bytes freed
//!
//! Steps 1, 2 and 4 may be answered ahead of time through
//! [`SessionOptions`]. Running out of input at any question ends the
//! session without touching the filesystem.

use std::io::{self, Write};
use std::path::Path;

use crate::actions::{delete_selected, BatchDeleteResult, DeleteConfig, NoProgress};
use crate::duplicates::{AddressTable, DuplicateFinder, FinderConfig, FinderError, SortOrder};
use crate::error::ExitCode;
use crate::output::{detection_summary, write_duplicate_listing, write_freed, write_size_listing};
use crate::prompt::{ask_selection, ask_sort_order, ask_suffix, ask_yes_no, Prompt};

/// Errors that end a session early.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    /// The root could not be scanned.
    #[error(transparent)]
    Finder(#[from] FinderError),

    /// Reading answers or writing output failed.
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Answers supplied before the session starts.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Answer to the suffix question.
    pub suffix: Option<String>,
    /// Answer to the sort question.
    pub sort_order: Option<SortOrder>,
    /// Skip the "Check for duplicates?" question and go ahead.
    pub check: bool,
    /// How selected files are removed.
    pub delete: DeleteConfig,
}

/// Where a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Input ended before the session finished.
    InputClosed,
    /// The user chose not to run duplicate detection.
    DetectionDeclined,
    /// Detection ran and found nothing.
    NoDuplicates,
    /// The user chose not to delete anything.
    DeletionDeclined,
    /// Selected files were deleted.
    Deleted,
}

/// What a finished session did.
#[derive(Debug)]
pub struct SessionReport {
    /// Where the session stopped.
    pub end: SessionEnd,
    /// Entries skipped during the walk.
    pub scan_errors: usize,
    /// Files that could not be hashed.
    pub hash_errors: usize,
    /// Number of listed duplicate files, if detection ran.
    pub duplicate_files: Option<usize>,
    /// Deletion result, if deletion ran.
    pub deletion: Option<BatchDeleteResult>,
}

impl SessionReport {
    fn new(end: SessionEnd) -> Self {
        Self {
            end,
            scan_errors: 0,
            hash_errors: 0,
            duplicate_files: None,
            deletion: None,
        }
    }

    /// Bytes freed by the deletion step.
    #[must_use]
    pub fn bytes_freed(&self) -> u64 {
        self.deletion.as_ref().map_or(0, |d| d.bytes_freed)
    }

    /// Process exit code for this session.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        let delete_failures = self.deletion.as_ref().map_or(0, |d| d.failure_count());
        let had_errors = self.scan_errors + self.hash_errors + delete_failures > 0;
        ExitCode::for_run(self.end != SessionEnd::NoDuplicates, had_errors)
    }
}

/// One interactive run over a directory tree.
pub struct Session<P, W> {
    finder_config: FinderConfig,
    options: SessionOptions,
    prompt: P,
    out: W,
}

impl<P: Prompt, W: Write> Session<P, W> {
    /// Create a session.
    ///
    /// `finder_config` supplies thread count, symlink handling and progress
    /// reporting; its suffix is replaced by the session's answer.
    pub fn new(finder_config: FinderConfig, options: SessionOptions, prompt: P, out: W) -> Self {
        Self {
            finder_config,
            options,
            prompt,
            out,
        }
    }

    /// Hand back the prompt and the output writer.
    pub fn into_parts(self) -> (P, W) {
        (self.prompt, self.out)
    }

    /// Run the session against `root`.
    ///
    /// # Errors
    ///
    /// Fails when `root` is not a readable directory or terminal I/O
    /// fails. Per-file problems are counted in the report instead.
    pub fn run(&mut self, root: &Path) -> Result<SessionReport, SessionError> {
        DuplicateFinder::validate_root(root)?;

        let suffix = match self.options.suffix.clone() {
            Some(suffix) => suffix,
            None => match ask_suffix(&mut self.prompt)? {
                Some(suffix) => suffix,
                None => return Ok(SessionReport::new(SessionEnd::InputClosed)),
            },
        };

        let order = match self.options.sort_order {
            Some(order) => order,
            None => match ask_sort_order(&mut self.prompt, &mut self.out)? {
                Some(order) => order,
                None => return Ok(SessionReport::new(SessionEnd::InputClosed)),
            },
        };

        let mut walker_config = self.finder_config.walker_config.clone();
        walker_config.suffix = suffix;
        let finder =
            DuplicateFinder::new(self.finder_config.clone().with_walker_config(walker_config));

        let scan = finder.scan(root)?;
        let mut report = SessionReport::new(SessionEnd::InputClosed);
        report.scan_errors = scan.errors.len();
        write_size_listing(&mut self.out, &scan.buckets, order)?;

        if !self.options.check {
            match ask_yes_no(&mut self.prompt, &mut self.out, "Check for duplicates?")? {
                Some(true) => {}
                Some(false) => return Ok(finish(report, SessionEnd::DetectionDeclined)),
                None => return Ok(report),
            }
        }

        let (duplicates, stats) = finder.detect(&scan.buckets, order);
        report.hash_errors = stats.failed_files;
        let listed = write_duplicate_listing(&mut self.out, &duplicates)?;
        report.duplicate_files = Some(listed);
        log::info!("{}", detection_summary(&stats));

        if duplicates.is_empty() {
            writeln!(self.out)?;
            writeln!(self.out, "{}", detection_summary(&stats))?;
            return Ok(finish(report, SessionEnd::NoDuplicates));
        }

        match ask_yes_no(&mut self.prompt, &mut self.out, "Delete files?")? {
            Some(true) => {}
            Some(false) => return Ok(finish(report, SessionEnd::DeletionDeclined)),
            None => return Ok(report),
        }

        let table = AddressTable::build(&duplicates);
        let Some(selection) = ask_selection(&mut self.prompt, &mut self.out, table.len())? else {
            return Ok(report);
        };

        let result =
            delete_selected::<NoProgress>(&table, &selection, &self.options.delete, None);
        for failure in &result.failures {
            writeln!(
                self.out,
                "Could not delete {}: {}",
                failure.path.display(),
                failure.message
            )?;
        }
        write_freed(&mut self.out, result.bytes_freed)?;
        self.out.flush()?;

        report.deletion = Some(result);
        Ok(finish(report, SessionEnd::Deleted))
    }
}

fn finish(mut report: SessionReport, end: SessionEnd) -> SessionReport {
    report.end = end;
    report
}
