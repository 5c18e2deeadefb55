use dupfinder::cli::Cli;
use dupfinder::config::{Config, ConfigError};
use dupfinder::duplicates::SortOrder;
use clap::Parser;
use figment::providers::{Env, Serialized};
use figment::Figment;
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

// Environment variables are process-wide
static ENV_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_config_load_defaults() {
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.io_threads, 4);
    assert!(!config.follow_symlinks);
    assert!(!config.use_trash);
    assert!(config.suffix.is_none());
}

#[test]
fn test_config_load_from_env() {
    let _guard = ENV_MUTEX.lock().unwrap();
    std::env::set_var("DUPFINDER_IO_THREADS", "16");
    std::env::set_var("DUPFINDER_SORT_ORDER", "ascending");

    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("DUPFINDER_"));
    let config: Config = figment.extract().unwrap();

    std::env::remove_var("DUPFINDER_IO_THREADS");
    std::env::remove_var("DUPFINDER_SORT_ORDER");

    assert_eq!(config.io_threads, 16);
    assert_eq!(config.sort_order, Some(SortOrder::Ascending));
}

#[test]
fn test_env_overrides_file() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "io_threads = 2\nfollow_symlinks = true\n").unwrap();
    std::env::set_var("DUPFINDER_IO_THREADS", "3");

    let result = Config::load(Some(&path));
    std::env::remove_var("DUPFINDER_IO_THREADS");
    let config = result.unwrap();

    assert_eq!(config.io_threads, 3);
    assert!(config.follow_symlinks);
}

#[test]
fn test_cli_overrides_env() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "suffix = \".flac\"\n").unwrap();
    std::env::set_var("DUPFINDER_USE_TRASH", "false");

    let cli = Cli::try_parse_from([
        "dupfinder",
        "/music",
        "--config",
        path.to_str().unwrap(),
        "--trash",
        "--suffix",
        ".mp3",
    ])
    .unwrap();
    let result = Config::from_cli(&cli);
    std::env::remove_var("DUPFINDER_USE_TRASH");
    let config = result.unwrap();

    assert!(config.use_trash);
    assert_eq!(config.suffix.as_deref(), Some(".mp3"));
}

#[test]
fn test_config_invalid_toml() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "io_threads = [").unwrap();

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().starts_with("Invalid configuration"));
}

#[test]
fn test_config_unknown_sort_order() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "sort_order = \"random\"\n").unwrap();

    assert!(Config::load(Some(&path)).is_err());
}
