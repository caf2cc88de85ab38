//! End-to-end tests of the command-line flow through `run_with_io`.

use clap::Parser;
use sortdupe::cli::Cli;
use sortdupe::error::ExitCode;
use sortdupe::organizer::OrganizeError;
use sortdupe::run_with_io;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

use crate::env_lock;

struct Fixture {
    root: TempDir,
    config_dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            root: tempdir().unwrap(),
            config_dir: tempdir().unwrap(),
        };
        fs::write(fixture.config_path(), "").unwrap();
        fixture
    }

    fn config_path(&self) -> std::path::PathBuf {
        self.config_dir.path().join("config.toml")
    }

    fn write(&self, rel: &str, content: &[u8]) {
        let path = self.root.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Run with `extra` flags, feeding `answer` to the prompt.
    fn run(&self, extra: &[&str], answer: &str) -> (anyhow::Result<ExitCode>, String) {
        let mut args = vec![
            "sortdupe".to_string(),
            "--no-progress".to_string(),
            "--no-color".to_string(),
            "--config".to_string(),
            self.config_path().display().to_string(),
        ];
        args.extend(extra.iter().map(|s| (*s).to_string()));
        args.push(self.path().display().to_string());

        let cli = Cli::try_parse_from(args).unwrap();
        let mut input = answer.as_bytes();
        let mut output = Vec::new();
        let result = run_with_io(cli, &mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }
}

#[test]
fn test_yes_skips_prompt_and_moves() {
    let _lock = env_lock();
    let fx = Fixture::new();
    fx.write("a.txt", b"same");
    fx.write("b.txt", b"same");

    let (result, output) = fx.run(&["-y"], "");

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(!output.contains("Proceed?"));
    assert!(output.contains("Unique:     1"));
    assert!(output.contains("Duplicates: 1"));
    assert!(fx.path().join("FILE_TYPE_TXT").is_dir());
    assert!(fx.path().join("DUPLICATES_TXT").is_dir());
}

#[test]
fn test_prompt_declined_changes_nothing() {
    let _lock = env_lock();
    let fx = Fixture::new();
    fx.write("a.txt", b"same");
    fx.write("b.txt", b"same");

    let (result, output) = fx.run(&[], "n\n");

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(output.contains("2 file(s) would be moved (1 unique, 1 duplicate)"));
    assert!(output.contains("Proceed? [y/N]"));
    assert!(output.contains("Operation cancelled."));
    assert!(fx.path().join("a.txt").exists());
    assert!(fx.path().join("b.txt").exists());
    assert!(!fx.path().join("FILE_TYPE_TXT").exists());
}

#[test]
fn test_prompt_accepted_moves() {
    let _lock = env_lock();
    let fx = Fixture::new();
    fx.write("a.txt", b"one");

    let (result, output) = fx.run(&[], "yes\n");

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(output.contains("Proceed?"));
    assert!(fx.path().join("FILE_TYPE_TXT/a.txt").exists());
}

#[test]
fn test_nothing_to_move_needs_no_prompt() {
    let _lock = env_lock();
    let fx = Fixture::new();
    fx.write(".hidden", b"h");

    let (result, output) = fx.run(&[], "");

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(!output.contains("Proceed?"));
    assert!(output.contains("Skipped:    1 (hidden: 1)"));
}

#[test]
fn test_dry_run_flag() {
    let _lock = env_lock();
    let fx = Fixture::new();
    fx.write("a.txt", b"same");
    fx.write("b.txt", b"same");

    let (result, output) = fx.run(&["--dry-run"], "");

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(output.starts_with("Dry run:"));
    assert!(output.contains("(DUPLICATE)"));
    assert!(fx.path().join("a.txt").exists());
    assert!(fx.path().join("b.txt").exists());
}

#[test]
fn test_json_output() {
    let _lock = env_lock();
    let fx = Fixture::new();
    fx.write("a.txt", b"same");
    fx.write("b.txt", b"same");
    fx.write("c.pdf", b"pdf");

    let (result, output) = fx.run(&["-y", "--output", "json"], "");

    assert_eq!(result.unwrap(), ExitCode::Success);
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["stats"]["unique"], 2);
    assert_eq!(parsed["stats"]["duplicate"], 1);
    assert_eq!(parsed["records"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["exit_code_name"], "SD000");
}

#[test]
fn test_quiet_text_output_is_empty() {
    let _lock = env_lock();
    let fx = Fixture::new();
    fx.write("a.txt", b"x");

    let (result, output) = fx.run(&["-y", "-q"], "");

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(output.is_empty());
}

#[test]
fn test_missing_root_is_organize_error() {
    let _lock = env_lock();
    let fx = Fixture::new();
    let missing = fx.path().join("does-not-exist");

    let cli = Cli::try_parse_from([
        "sortdupe".to_string(),
        "-y".to_string(),
        "--no-progress".to_string(),
        "--config".to_string(),
        fx.config_path().display().to_string(),
        missing.display().to_string(),
    ])
    .unwrap();
    let err = run_with_io(cli, &mut "".as_bytes(), &mut Vec::new()).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<OrganizeError>(),
        Some(OrganizeError::DirectoryNotFound(_))
    ));
}

#[test]
fn test_invalid_configuration_fails_before_moving() {
    let _lock = env_lock();
    let fx = Fixture::new();
    fx.write("a.txt", b"x");

    let (result, _) = fx.run(
        &["-y", "--unique-prefix", "SAME", "--duplicate-prefix", "SAME"],
        "",
    );

    assert!(result.is_err());
    assert!(fx.path().join("a.txt").exists());
}

#[test]
fn test_env_configuration_applies() {
    let _lock = env_lock();
    let fx = Fixture::new();
    fx.write("a.txt", b"x");
    fx.write("b.pdf", b"y");

    std::env::set_var("SORTDUPE_INCLUDE_EXTENSIONS", "pdf");
    let (result, _) = fx.run(&["-y"], "");
    std::env::remove_var("SORTDUPE_INCLUDE_EXTENSIONS");

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(fx.path().join("a.txt").exists());
    assert!(fx.path().join("FILE_TYPE_PDF/b.pdf").exists());
}

#[test]
fn test_audit_and_log_files() {
    let _lock = env_lock();
    let fx = Fixture::new();
    fx.write("a.txt", b"same");
    fx.write("b.txt", b"same");
    let out = tempdir().unwrap();
    let audit = out.path().join("audit.txt");
    let log = out.path().join("run.log");

    let (result, _) = fx.run(
        &[
            "-y",
            "--audit-file",
            audit.to_str().unwrap(),
            "--log-file",
            log.to_str().unwrap(),
        ],
        "",
    );

    assert_eq!(result.unwrap(), ExitCode::Success);
    let text = fs::read_to_string(&audit).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert_eq!(
        text.lines().filter(|l| l.ends_with(" (DUPLICATE)")).count(),
        1
    );
}
