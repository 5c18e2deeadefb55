//! dupfinder - interactive duplicate file finder
//!
//! Files under a directory are grouped by size, then by BLAKE3 digest of
//! their full content. Confirmed duplicates are listed with stable numbers
//! that the user can pick for deletion.
//!
//! # Pipeline
//!
//! [`scanner`] → [`duplicates::group_by_size`] → [`duplicates::build_duplicate_set`]
//! → [`duplicates::AddressTable`] → [`actions::delete_selected`]

pub mod actions;
pub mod app;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod prompt;
pub mod scanner;
pub mod selection;

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::DeleteConfig;
use crate::app::{Session, SessionOptions};
use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::{JsonOutput, OutputFormat};
use crate::progress::Progress;
use crate::prompt::StdinPrompt;
use crate::scanner::WalkerConfig;

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error for invalid configuration, an unusable root directory
/// or failing terminal I/O. Per-file problems only change the exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = Config::from_cli(&cli).context("Failed to load configuration")?;
    log::debug!("Effective configuration: {:?}", config);

    let hide_progress = cli.quiet || cli.output == OutputFormat::Json;
    let finder_config = FinderConfig::default()
        .with_io_threads(config.io_threads)
        .with_walker_config(WalkerConfig::default().follow_symlinks(config.follow_symlinks))
        .with_progress_callback(Arc::new(Progress::new(hide_progress)));

    match cli.output {
        OutputFormat::Json => run_report(&cli.path, &config, finder_config),
        OutputFormat::Text => {
            let options = SessionOptions {
                suffix: config.suffix.clone(),
                sort_order: config.sort_order,
                check: cli.check,
                delete: DeleteConfig {
                    use_trash: config.use_trash,
                },
            };
            let mut session =
                Session::new(finder_config, options, StdinPrompt::stdio(), io::stdout());
            let report = session
                .run(&cli.path)
                .with_context(|| format!("Failed to search {}", cli.path.display()))?;
            log::debug!("Session ended: {:?}", report.end);
            Ok(report.exit_code())
        }
    }
}

/// Detect duplicates without asking anything and print a JSON report.
fn run_report(root: &Path, config: &Config, finder_config: FinderConfig) -> Result<ExitCode> {
    let suffix = config.suffix.clone().unwrap_or_default();
    let order = config.sort_order.unwrap_or_default();

    let finder = DuplicateFinder::new(
        finder_config.with_walker_config(
            WalkerConfig::with_suffix(suffix).follow_symlinks(config.follow_symlinks),
        ),
    );
    let scan = finder
        .scan(root)
        .with_context(|| format!("Failed to search {}", root.display()))?;
    let (duplicates, stats) = finder.detect(&scan.buckets, order);

    let exit_code = ExitCode::for_run(
        !duplicates.is_empty(),
        !scan.errors.is_empty() || stats.failed_files > 0,
    );
    let output = JsonOutput::new(
        &duplicates,
        order,
        &scan.grouping,
        &stats,
        scan.errors.len(),
        exit_code,
    );
    output
        .write_to(&mut io::stdout().lock(), true)
        .context("Failed to write JSON report")?;

    Ok(exit_code)
}
