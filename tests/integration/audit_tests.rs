use sortdupe::config::RunConfig;
use sortdupe::organizer::audit::{write_audit, DRY_RUN_HEADER};
use sortdupe::organizer::{write_audit_file, Organizer};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_audit_lines_match_moves() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"same").unwrap();
    fs::write(dir.path().join("b.txt"), b"same").unwrap();
    fs::write(dir.path().join("c.md"), b"doc").unwrap();

    let report = Organizer::new(RunConfig::default()).run(dir.path()).unwrap();
    let mut buffer = Vec::new();
    write_audit(&mut buffer, &report).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    assert_eq!(text.lines().count(), 3);
    for line in text.lines() {
        let (source, rest) = line.split_once(" -> ").unwrap();
        let destination = rest.trim_end_matches(" (DUPLICATE)");
        assert!(!std::path::Path::new(source).exists());
        assert!(std::path::Path::new(destination).exists());
        assert_eq!(
            line.ends_with(" (DUPLICATE)"),
            destination.contains("DUPLICATES_")
        );
    }
}

#[test]
fn test_dry_run_audit_is_marked() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"x").unwrap();
    let out = tempdir().unwrap();
    let audit = out.path().join("audit.txt");

    let report = Organizer::new(RunConfig::default().with_dry_run(true))
        .run(dir.path())
        .unwrap();
    write_audit_file(&audit, &report).unwrap();

    let text = fs::read_to_string(&audit).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(DRY_RUN_HEADER));
    let line = lines.next().unwrap();
    let expected = dir.path().join("FILE_TYPE_TXT").join("a.txt");
    assert!(line.ends_with(&expected.display().to_string()));
    assert!(lines.next().is_none());
}
