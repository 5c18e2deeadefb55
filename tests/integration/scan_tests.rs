use dupfinder::duplicates::{
    group_by_digest, AddressTable, DuplicateFinder, FinderConfig, FinderError, SortOrder,
};
use dupfinder::scanner::{Hasher, WalkerConfig};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let report = finder.scan(dir.path()).unwrap();
    let (duplicates, stats) = finder.detect(&report.buckets, SortOrder::Descending);

    assert!(duplicates.is_empty());
    assert_eq!(report.grouping.total_files, 0);
    assert_eq!(stats.duplicate_groups, 0);
}

#[test]
fn test_reference_scenario() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("A");
    let b = dir.path().join("B");
    let c = dir.path().join("C");
    let d = dir.path().join("D");
    fs::write(&a, "x".repeat(100)).unwrap();
    fs::write(&b, "x".repeat(100)).unwrap();
    fs::write(&c, "y".repeat(100)).unwrap();
    fs::write(&d, "z".repeat(50)).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let report = finder.scan(dir.path()).unwrap();

    // Size stage keeps the 100-byte bucket only
    assert_eq!(report.buckets.len(), 1);
    let bucket = report.buckets.get(100).unwrap();
    let bucket_paths: Vec<_> = bucket.iter().map(|r| r.path.clone()).collect();
    assert_eq!(bucket_paths, vec![a.clone(), b.clone(), c.clone()]);
    assert!(report.buckets.get(50).is_none());

    // Digest stage drops C's singleton group
    let outcome = group_by_digest(bucket, &Hasher::new());
    assert_eq!(outcome.groups.len(), 1);
    assert_eq!(
        outcome.groups[&Hasher::hash_bytes("x".repeat(100).as_bytes())],
        vec![a.clone(), b.clone()]
    );

    let (duplicates, _) = finder.detect(&report.buckets, SortOrder::Descending);
    let table = AddressTable::build(&duplicates);
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(0).unwrap().path, a);
    assert_eq!(table.get(0).unwrap().size, 100);
    assert_eq!(table.get(1).unwrap().path, b);
}

#[test]
fn test_digest_groups_match_content_equality() {
    let dir = tempdir().unwrap();
    // Same size, three distinct contents, one repeated
    for (name, content) in [
        ("1.bin", "aaaa"),
        ("2.bin", "bbbb"),
        ("3.bin", "aaaa"),
        ("4.bin", "cccc"),
        ("5.bin", "bbbb"),
    ] {
        fs::write(dir.path().join(name), content).unwrap();
    }

    let finder = DuplicateFinder::with_defaults();
    let (duplicates, stats) = finder
        .find_duplicates(dir.path(), SortOrder::Descending)
        .unwrap();

    let groups = &duplicates.entries()[0].groups;
    assert_eq!(groups.len(), 2);
    assert_eq!(
        groups[0].paths,
        vec![dir.path().join("1.bin"), dir.path().join("3.bin")]
    );
    assert_eq!(
        groups[1].paths,
        vec![dir.path().join("2.bin"), dir.path().join("5.bin")]
    );
    assert_eq!(stats.hashed_files, 5);
}

#[test]
fn test_empty_files_form_a_group() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("e1"), b"").unwrap();
    fs::write(dir.path().join("e2"), b"").unwrap();
    fs::write(dir.path().join("full"), b"data").unwrap();

    let (duplicates, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path(), SortOrder::Ascending)
        .unwrap();

    assert_eq!(duplicates.sizes().collect::<Vec<_>>(), vec![0]);
    assert_eq!(duplicates.file_count(), 2);
    assert_eq!(duplicates.reclaimable_bytes(), 0);
}

#[test]
fn test_suffix_filter_limits_candidates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.jpg"), b"same").unwrap();
    fs::write(dir.path().join("b.png"), b"same").unwrap();
    fs::write(dir.path().join("c.jpg"), b"same").unwrap();

    let config = FinderConfig::default().with_walker_config(WalkerConfig::with_suffix(".jpg"));
    let (duplicates, _) = DuplicateFinder::new(config)
        .find_duplicates(dir.path(), SortOrder::Descending)
        .unwrap();

    let paths = &duplicates.entries()[0].groups[0].paths;
    assert_eq!(
        paths,
        &vec![dir.path().join("a.jpg"), dir.path().join("c.jpg")]
    );
}

#[test]
fn test_nested_directories_are_walked() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("one").join("two");
    fs::create_dir_all(&nested).unwrap();
    fs::write(dir.path().join("top.txt"), b"payload").unwrap();
    fs::write(nested.join("deep.txt"), b"payload").unwrap();

    let (duplicates, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path(), SortOrder::Descending)
        .unwrap();

    assert_eq!(duplicates.file_count(), 2);
}

#[test]
fn test_scan_nonexistent_root() {
    let result = DuplicateFinder::with_defaults()
        .find_duplicates(std::path::Path::new("/definitely/not/here"), SortOrder::Descending);
    assert!(matches!(result, Err(FinderError::PathNotFound(_))));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_left_unclassified() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"same").unwrap();
    fs::write(dir.path().join("b"), b"same").unwrap();
    let locked = dir.path().join("c");
    fs::write(&locked, b"same").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root can read anything, in which case there is nothing to test
    if fs::read(&locked).is_ok() {
        return;
    }

    let (duplicates, stats) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path(), SortOrder::Descending)
        .unwrap();

    assert_eq!(stats.failed_files, 1);
    assert_eq!(
        duplicates.entries()[0].groups[0].paths,
        vec![dir.path().join("a"), dir.path().join("b")]
    );

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
}
