//! Filesystem edge cases: symlinks, unreadable files, odd names.

use sortdupe::config::RunConfig;
use sortdupe::organizer::Organizer;
use sortdupe::scanner::SkipReason;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_multiple_dots_use_last_extension() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("archive.tar.gz"), b"gz").unwrap();

    Organizer::new(RunConfig::default()).run(dir.path()).unwrap();

    assert!(dir.path().join("FILE_TYPE_GZ/archive.tar.gz").exists());
}

#[test]
fn test_trailing_dot_has_no_extension() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("weird."), b"x").unwrap();

    let report = Organizer::new(RunConfig::default()).run(dir.path()).unwrap();

    assert!(dir.path().join("weird.").exists());
    assert_eq!(report.stats.skipped_by(SkipReason::NoExtension), 1);
}

#[test]
fn test_unicode_and_space_names() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("résumé final.pdf"), b"cv").unwrap();
    fs::write(dir.path().join("日本語.txt"), b"text").unwrap();

    let report = Organizer::new(RunConfig::default()).run(dir.path()).unwrap();

    assert_eq!(report.stats.unique, 2);
    assert!(dir.path().join("FILE_TYPE_PDF/résumé final.pdf").exists());
    assert!(dir.path().join("FILE_TYPE_TXT/日本語.txt").exists());
}

#[test]
fn test_empty_files_are_duplicates_of_each_other() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"").unwrap();
    fs::write(dir.path().join("b.txt"), b"").unwrap();

    let report = Organizer::new(RunConfig::default()).run(dir.path()).unwrap();

    assert_eq!(report.stats.unique, 1);
    assert_eq!(report.stats.duplicate, 1);
    assert_eq!(report.stats.bytes_moved, 0);
}

#[test]
fn test_many_duplicates_get_distinct_names() {
    let dir = tempdir().unwrap();
    for i in 0..5 {
        let sub = dir.path().join(format!("copy{i}"));
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("photo.jpg"), b"same pixels").unwrap();
    }

    let report = Organizer::new(RunConfig::default()).run(dir.path()).unwrap();

    assert_eq!(report.stats.unique, 1);
    assert_eq!(report.stats.duplicate, 4);
    let dupes = dir.path().join("DUPLICATES_JPG");
    assert!(dupes.join("photo.jpg").exists());
    for n in 1..=3 {
        assert!(dupes.join(format!("photo_{n}.jpg")).exists());
    }
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_followed_or_moved() {
    let dir = tempdir().unwrap();
    let outside = tempdir().unwrap();
    fs::write(outside.path().join("target.txt"), b"outside").unwrap();
    std::os::unix::fs::symlink(outside.path(), dir.path().join("linked_dir")).unwrap();
    std::os::unix::fs::symlink(
        outside.path().join("target.txt"),
        dir.path().join("link.txt"),
    )
    .unwrap();

    let report = Organizer::new(RunConfig::default()).run(dir.path()).unwrap();

    assert_eq!(report.stats.moved(), 0);
    assert!(outside.path().join("target.txt").exists());
    assert!(fs::symlink_metadata(dir.path().join("link.txt")).is_ok());
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_counted_and_left_in_place() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked.txt");
    fs::write(&locked, b"secret").unwrap();
    fs::write(dir.path().join("open.txt"), b"public").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read regardless of mode bits.
    if fs::read(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let report = Organizer::new(RunConfig::default()).run(dir.path()).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(report.stats.errors, 1);
    assert_eq!(report.stats.unique, 1);
    assert!(locked.exists());
    assert_eq!(report.errors[0].stage, "hash");
    assert_eq!(report.errors[0].path, locked);
}

#[cfg(unix)]
#[test]
fn test_non_utf8_names_survive_and_stay_distinct() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    // Two names that would collapse to the same text under lossy decoding.
    let latin1 = OsStr::from_bytes(b"caf\xe9.txt");
    let other = OsStr::from_bytes(b"caf\xff.txt");
    fs::write(dir.path().join(latin1), b"one").unwrap();
    fs::write(dir.path().join(other), b"two").unwrap();

    let report = Organizer::new(RunConfig::default()).run(dir.path()).unwrap();

    let bucket = dir.path().join("FILE_TYPE_TXT");
    assert_eq!(report.stats.unique, 2);
    assert_eq!(fs::read(bucket.join(latin1)).unwrap(), b"one");
    assert_eq!(fs::read(bucket.join(other)).unwrap(), b"two");
    assert!(report
        .records
        .iter()
        .all(|r| r.source.file_name() == r.destination.file_name()));
}
