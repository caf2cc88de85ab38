//! Integration tests for the configuration stack: defaults, TOML file,
//! `SORTDUPE_*` environment variables, CLI overrides and validation.

use chrono::{TimeZone, Utc};
use clap::Parser;
use sortdupe::cli::Cli;
use sortdupe::config::{BucketKind, Config, ConfigError};
use sortdupe::scanner::HashAlgorithm;
use std::fs;
use tempfile::tempdir;

use crate::env_lock;

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 0).unwrap()
}

// =============================================================================
// File and Environment Layering
// =============================================================================

#[test]
fn test_config_file_overrides_defaults() {
    let _lock = env_lock();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
min_file_size = 2048
use_timestamp = true
date_format = "%Y-%m"
unique_folder_prefix = "TYPE"
ignored_folders = ["keep", "archive"]
hash_algorithm = "blake3"
"#,
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();

    assert_eq!(config.min_file_size, 2048);
    assert!(config.use_timestamp);
    assert_eq!(config.date_format, "%Y-%m");
    assert_eq!(config.unique_folder_prefix, "TYPE");
    assert_eq!(config.duplicate_folder_prefix, "DUPLICATES");
    assert_eq!(config.ignored_folders, vec!["keep", "archive"]);
    assert_eq!(config.hash_algorithm, HashAlgorithm::Blake3);
}

#[test]
fn test_env_overrides_file() {
    let _lock = env_lock();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "min_file_size = 2048\n").unwrap();

    std::env::set_var("SORTDUPE_MIN_FILE_SIZE", "4096");
    std::env::set_var("SORTDUPE_INCLUDE_EXTENSIONS", "jpg,png");
    let config = Config::load(Some(&path));
    std::env::remove_var("SORTDUPE_MIN_FILE_SIZE");
    std::env::remove_var("SORTDUPE_INCLUDE_EXTENSIONS");

    let config = config.unwrap();
    assert_eq!(config.min_file_size, 4096);
    assert_eq!(config.include_extensions, vec!["jpg", "png"]);
}

#[test]
fn test_cli_overrides_env() {
    let _lock = env_lock();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "").unwrap();

    std::env::set_var("SORTDUPE_MIN_FILE_SIZE", "4096");
    std::env::set_var("SORTDUPE_DRY_RUN", "true");
    let config = Config::load(Some(&path));
    std::env::remove_var("SORTDUPE_MIN_FILE_SIZE");
    std::env::remove_var("SORTDUPE_DRY_RUN");

    let mut config = config.unwrap();
    let cli = Cli::try_parse_from(["sortdupe", "--min-size", "1KB"]).unwrap();
    cli.apply_overrides(&mut config);

    assert_eq!(config.min_file_size, 1000);
    // A flag that was not given cannot switch an env value back off.
    assert!(config.dry_run);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let _lock = env_lock();
    let dir = tempdir().unwrap();

    let result = Config::load(Some(&dir.path().join("nope.toml")));

    assert!(matches!(result, Err(ConfigError::MissingFile(_))));
}

#[test]
fn test_malformed_file_is_an_error() {
    let _lock = env_lock();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "min_file_size = \"lots\"\n").unwrap();

    let result = Config::load(Some(&path));

    assert!(matches!(result, Err(ConfigError::Load(_))));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_validation_normalizes_sets() {
    let config = Config {
        include_extensions: vec![".jpg".to_string(), "Png".to_string()],
        ignored_folders: vec!["Node_Modules".to_string()],
        ..Config::default()
    };

    let run = config.into_run_config(&now()).unwrap();

    assert!(run.include_extensions.contains("JPG"));
    assert!(run.include_extensions.contains("PNG"));
    assert!(run.ignored_folders.contains("node_modules"));
}

#[test]
fn test_timestamp_rendered_once() {
    let config = Config {
        use_timestamp: true,
        ..Config::default()
    };

    let run = config.into_run_config(&now()).unwrap();

    assert_eq!(run.timestamp.as_deref(), Some("20240309"));
}

#[test]
fn test_file_values_flow_into_bucket_names() {
    let _lock = env_lock();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
use_timestamp = true
date_format = "%Y-%m"
duplicate_folder_prefix = "COPIES"
"#,
    )
    .unwrap();

    let run = Config::load(Some(&path))
        .unwrap()
        .into_run_config(&now())
        .unwrap();

    assert_eq!(
        run.bucket_name(BucketKind::Duplicate, "PDF"),
        "COPIES_PDF_2024-03"
    );
    assert!(run.is_bucket_folder("COPIES_PDF_2023-12"));
}

#[test]
fn test_invalid_file_values_fail_validation() {
    let _lock = env_lock();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "min_file_size = 10\nmax_file_size = 5\n").unwrap();

    let result = Config::load(Some(&path)).unwrap().into_run_config(&now());

    assert!(matches!(
        result,
        Err(ConfigError::SizeRange { min: 10, max: 5 })
    ));
}
