//! Application configuration management.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the platform config directory, or the file given
//!    with `--config`
//! 3. `DUPFINDER_*` environment variables (e.g. `DUPFINDER_IO_THREADS=8`)
//! 4. Command-line flags
//!
//! `suffix` and `sort_order` are optional: when set they answer the
//! matching interactive prompt.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::duplicates::SortOrder;

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "DUPFINDER_";

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or holds an invalid value.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// A value parsed but is out of range.
    #[error("Invalid configuration: {0}")]
    OutOfRange(String),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Invalid(Box::new(e))
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Threads used for hashing.
    pub io_threads: usize,
    /// Follow symbolic links while walking.
    pub follow_symlinks: bool,
    /// Move deleted files to the trash instead of removing them.
    pub use_trash: bool,
    /// Pre-answered file-name suffix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Pre-answered sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            io_threads: 4,
            follow_symlinks: false,
            use_trash: false,
            suffix: None,
            sort_order: None,
        }
    }
}

impl Config {
    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "dupfinder", "dupfinder")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Build the figment for defaults, one TOML file and the environment.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load configuration without command-line overrides.
    ///
    /// With `explicit` the file must exist; otherwise the default path is
    /// used when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a missing explicit file, malformed TOML
    /// or an invalid value.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) if !path.is_file() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|p| p.is_file()),
        };
        if let Some(ref path) = file {
            log::debug!("Loading configuration from {}", path.display());
        }

        let config: Self = Self::figment(file.as_deref()).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration and apply command-line flags on top.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Ok(Self::load(cli.config.as_deref())?.with_cli_overrides(cli))
    }

    /// Apply flags that were given on the command line.
    #[must_use]
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        if let Some(threads) = cli.io_threads {
            self.io_threads = usize::from(threads);
        }
        if cli.follow_symlinks {
            self.follow_symlinks = true;
        }
        if cli.trash {
            self.use_trash = true;
        }
        if cli.suffix.is_some() {
            self.suffix.clone_from(&cli.suffix);
        }
        if cli.order.is_some() {
            self.sort_order = cli.order;
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.io_threads == 0 {
            return Err(ConfigError::OutOfRange(
                "io_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
