//! FileSplitter tests: ordering, numbering, header skip, open failures.

use linetap::split::split;
use linetap::types::{DiscoveredFile, FileSignature};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tempfile::TempDir;

fn discovered(path: &Path) -> Arc<DiscoveredFile> {
    Arc::new(DiscoveredFile {
        path: path.to_path_buf(),
        signature: FileSignature::MtimeSize {
            mtime_ns: 0,
            size: 0,
        },
        discovered_at: SystemTime::now(),
    })
}

#[test]
fn test_split_yields_lines_in_order_numbered_from_one() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.csv");
    fs::write(&path, "one\ntwo\nthree\n").unwrap();

    let lines: Vec<_> = split(discovered(&path), false)
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines.iter().map(|l| l.number).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(
        lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>(),
        vec!["one", "two", "three"]
    );
}

#[test]
fn test_split_no_trailing_newline_still_yields_last_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.csv");
    fs::write(&path, "one\ntwo").unwrap();

    let lines: Vec<_> = split(discovered(&path), false)
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].text, "two");
}

#[test]
fn test_split_skip_header_preserves_physical_numbering() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.csv");
    fs::write(&path, "id;name\n1;Alice\n2;Bob\n").unwrap();

    let lines: Vec<_> = split(discovered(&path), true)
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    // The discarded header keeps number 1; the first yielded line is 2.
    assert_eq!(lines[0].number, 2);
    assert_eq!(lines[0].text, "1;Alice");
    assert_eq!(lines[1].number, 3);
}

#[test]
fn test_split_crlf_terminators_are_trimmed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.csv");
    fs::write(&path, "one\r\ntwo\r\n").unwrap();

    let lines: Vec<_> = split(discovered(&path), false)
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(
        lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>(),
        vec!["one", "two"]
    );
}

#[test]
fn test_split_empty_file_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.csv");
    fs::write(&path, "").unwrap();

    assert_eq!(split(discovered(&path), false).unwrap().count(), 0);
}

#[test]
fn test_split_header_only_file_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.csv");
    fs::write(&path, "id;name\n").unwrap();

    assert_eq!(split(discovered(&path), true).unwrap().count(), 0);
}

#[test]
fn test_split_missing_file_fails_to_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gone.csv");

    let err = split(discovered(&path), false).unwrap_err();
    assert_eq!(err.file, path);
    assert_eq!(err.line_number, 0);
}

#[test]
fn test_split_sequence_is_single_pass() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.csv");
    fs::write(&path, "one\n").unwrap();

    let mut seq = split(discovered(&path), false).unwrap();
    assert!(seq.next().is_some());
    assert!(seq.next().is_none());
    // Fused: once exhausted it stays exhausted.
    assert!(seq.next().is_none());
}
