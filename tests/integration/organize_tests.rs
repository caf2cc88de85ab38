use sortdupe::config::RunConfig;
use sortdupe::organizer::{MoveKind, Organizer};
use sortdupe::scanner::{HashAlgorithm, SkipReason};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn count_files(dir: &Path) -> usize {
    fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[test]
fn test_organize_empty_directory() {
    let dir = tempdir().unwrap();

    let report = Organizer::new(RunConfig::default()).run(dir.path()).unwrap();

    assert!(report.records.is_empty());
    assert_eq!(report.stats.total_processed(), 0);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_identical_files_split_into_unique_and_duplicate() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"same content");
    write(dir.path(), "b.txt", b"same content");
    write(dir.path(), "c.txt", b"other content");

    let report = Organizer::new(RunConfig::default()).run(dir.path()).unwrap();

    assert_eq!(report.stats.unique, 2);
    assert_eq!(report.stats.duplicate, 1);
    assert_eq!(count_files(&dir.path().join("FILE_TYPE_TXT")), 2);
    assert_eq!(count_files(&dir.path().join("DUPLICATES_TXT")), 1);
    assert!(fs::read(dir.path().join("FILE_TYPE_TXT/c.txt")).is_ok());
}

#[test]
fn test_name_collision_in_bucket_gets_suffix() {
    let dir = tempdir().unwrap();
    write(dir.path(), "2023/report.pdf", b"annual 2023");
    write(dir.path(), "2024/report.pdf", b"annual 2024");

    let report = Organizer::new(RunConfig::default()).run(dir.path()).unwrap();

    assert_eq!(report.stats.unique, 2);
    let bucket = dir.path().join("FILE_TYPE_PDF");
    assert!(bucket.join("report.pdf").exists());
    assert!(bucket.join("report_1.pdf").exists());
    assert_eq!(
        report
            .records
            .iter()
            .filter(|r| r.kind == MoveKind::Renamed)
            .count(),
        1
    );
}

#[test]
fn test_hidden_and_extensionless_files_stay() {
    let dir = tempdir().unwrap();
    write(dir.path(), ".env", b"SECRET=1");
    write(dir.path(), "README", b"read me");
    write(dir.path(), "notes.md", b"# notes");

    let report = Organizer::new(RunConfig::default()).run(dir.path()).unwrap();

    assert!(dir.path().join(".env").exists());
    assert!(dir.path().join("README").exists());
    assert!(dir.path().join("FILE_TYPE_MD/notes.md").exists());
    assert_eq!(report.stats.skipped_by(SkipReason::Hidden), 1);
    assert_eq!(report.stats.skipped_by(SkipReason::NoExtension), 1);
    assert_eq!(report.stats.unique, 1);
}

#[test]
fn test_size_bounds() {
    let dir = tempdir().unwrap();
    write(dir.path(), "tiny.txt", &[b'x'; 10]);
    write(dir.path(), "medium.txt", &[b'y'; 2000]);
    write(dir.path(), "large.txt", &[b'z'; 5000]);

    let config = RunConfig::default()
        .with_min_file_size(1024)
        .with_max_file_size(4096);
    let report = Organizer::new(config).run(dir.path()).unwrap();

    assert!(dir.path().join("tiny.txt").exists());
    assert!(dir.path().join("large.txt").exists());
    assert!(dir.path().join("FILE_TYPE_TXT/medium.txt").exists());
    assert_eq!(report.stats.skipped_by(SkipReason::TooSmall), 1);
    assert_eq!(report.stats.skipped_by(SkipReason::TooLarge), 1);
}

#[test]
fn test_exclude_wins_over_include() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.jpg", b"jpg");
    write(dir.path(), "b.png", b"png");
    write(dir.path(), "c.gif", b"gif");

    let config = RunConfig::default()
        .with_include_extensions(["jpg", "png"])
        .with_exclude_extensions(["png"]);
    let report = Organizer::new(config).run(dir.path()).unwrap();

    assert!(dir.path().join("FILE_TYPE_JPG/a.jpg").exists());
    assert!(dir.path().join("b.png").exists());
    assert!(dir.path().join("c.gif").exists());
    assert_eq!(report.stats.skipped_by(SkipReason::ExcludedExtension), 1);
    assert_eq!(report.stats.skipped_by(SkipReason::NotIncluded), 1);
}

#[test]
fn test_default_excludes_temporary_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "download.crdownload", b"partial");
    write(dir.path(), "debug.log", b"log");

    let report = Organizer::new(RunConfig::default()).run(dir.path()).unwrap();

    assert_eq!(report.stats.moved(), 0);
    assert_eq!(report.stats.skipped_by(SkipReason::ExcludedExtension), 2);
}

#[test]
fn test_ignored_folders_are_left_alone() {
    let dir = tempdir().unwrap();
    write(dir.path(), "node_modules/pkg/index.js", b"module.exports = 1");
    write(dir.path(), "Photos/a.jpg", b"photo");
    write(dir.path(), "src/main.js", b"main");

    let config = RunConfig::default().with_ignored_folders(["node_modules", "photos"]);
    let report = Organizer::new(config).run(dir.path()).unwrap();

    assert!(dir.path().join("node_modules/pkg/index.js").exists());
    assert!(dir.path().join("Photos/a.jpg").exists());
    assert!(dir.path().join("FILE_TYPE_JS/main.js").exists());
    assert_eq!(report.stats.skipped_by(SkipReason::IgnoredFolder), 2);
}

#[test]
fn test_nested_files_are_flattened_into_root_buckets() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/b/c/deep.txt", b"deep");

    Organizer::new(RunConfig::default()).run(dir.path()).unwrap();

    assert!(dir.path().join("FILE_TYPE_TXT/deep.txt").exists());
    assert!(!dir.path().join("a/b/c/deep.txt").exists());
    // Source directories are not removed.
    assert!(dir.path().join("a/b/c").is_dir());
}

#[test]
fn test_max_depth_limits_traversal() {
    let dir = tempdir().unwrap();
    write(dir.path(), "top.txt", b"top");
    write(dir.path(), "sub/nested.txt", b"nested");

    let config = RunConfig::default().with_max_depth(Some(1));
    let report = Organizer::new(config).run(dir.path()).unwrap();

    assert_eq!(report.stats.unique, 1);
    assert!(dir.path().join("FILE_TYPE_TXT/top.txt").exists());
    assert!(dir.path().join("sub/nested.txt").exists());
}

#[test]
fn test_second_run_is_a_no_op() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"same");
    write(dir.path(), "b.txt", b"same");
    write(dir.path(), "c.pdf", b"pdf");

    let first = Organizer::new(RunConfig::default()).run(dir.path()).unwrap();
    assert_eq!(first.stats.moved(), 3);

    let second = Organizer::new(RunConfig::default()).run(dir.path()).unwrap();

    assert!(second.records.is_empty());
    assert_eq!(second.stats.skipped_by(SkipReason::AlreadyOrganized), 3);
}

#[test]
fn test_timestamped_run_skips_earlier_buckets() {
    let dir = tempdir().unwrap();
    write(dir.path(), "FILE_TYPE_TXT_20230101/old.txt", b"old");
    write(dir.path(), "new.txt", b"new");

    let config = RunConfig::default().with_timestamp(Some("20240101".to_string()));
    let report = Organizer::new(config).run(dir.path()).unwrap();

    assert!(dir.path().join("FILE_TYPE_TXT_20230101/old.txt").exists());
    assert!(dir.path().join("FILE_TYPE_TXT_20240101/new.txt").exists());
    assert_eq!(report.stats.skipped_by(SkipReason::AlreadyOrganized), 1);
}

#[test]
fn test_dry_run_reports_without_moving() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"same");
    write(dir.path(), "b.txt", b"same");

    let dry = Organizer::new(RunConfig::default().with_dry_run(true))
        .run(dir.path())
        .unwrap();

    assert_eq!(dry.records.len(), 2);
    assert!(dir.path().join("a.txt").exists());
    assert!(dir.path().join("b.txt").exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);

    // The real run produces the same statistics.
    let real = Organizer::new(RunConfig::default()).run(dir.path()).unwrap();
    assert_eq!(real.stats.unique, dry.stats.unique);
    assert_eq!(real.stats.duplicate, dry.stats.duplicate);
    assert_eq!(real.stats.bytes_moved, dry.stats.bytes_moved);
}

#[test]
fn test_every_hash_algorithm_finds_the_same_duplicates() {
    for algorithm in [
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha512,
        HashAlgorithm::Blake3,
    ] {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.bin", b"payload");
        write(dir.path(), "b.bin", b"payload");
        write(dir.path(), "c.bin", b"different");

        let config = RunConfig::default().with_hash_algorithm(algorithm);
        let report = Organizer::new(config).run(dir.path()).unwrap();

        assert_eq!(report.stats.unique, 2, "{algorithm}");
        assert_eq!(report.stats.duplicate, 1, "{algorithm}");
    }
}

#[test]
fn test_custom_prefixes() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"same");
    write(dir.path(), "b.txt", b"same");

    let mut config = RunConfig::default();
    config.unique_prefix = "BY_TYPE".to_string();
    config.duplicate_prefix = "COPIES".to_string();
    Organizer::new(config).run(dir.path()).unwrap();

    assert_eq!(count_files(&dir.path().join("BY_TYPE_TXT")), 1);
    assert_eq!(count_files(&dir.path().join("COPIES_TXT")), 1);
}
