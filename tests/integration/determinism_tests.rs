use dupfinder::duplicates::{AddressTable, DuplicateFinder, FinderConfig, SortOrder};
use std::fs;
use tempfile::{tempdir, TempDir};

/// Several size buckets, several digest groups per bucket, nested dirs.
fn populated_tree() -> TempDir {
    let dir = tempdir().unwrap();
    for sub in ["", "x", "x/y", "z"] {
        let base = dir.path().join(sub);
        fs::create_dir_all(&base).unwrap();
        for (name, content) in [
            ("p.dat", "1111"),
            ("q.dat", "2222"),
            ("r.dat", "33333333"),
            ("s.dat", "44444444"),
            ("t.dat", "555555555555"),
        ] {
            fs::write(base.join(name), content).unwrap();
        }
    }
    dir
}

fn table_for(dir: &TempDir, threads: usize, order: SortOrder) -> AddressTable {
    let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(threads));
    let (duplicates, _) = finder.find_duplicates(dir.path(), order).unwrap();
    AddressTable::build(&duplicates)
}

#[test]
fn test_repeated_runs_produce_identical_tables() {
    let dir = populated_tree();

    let first = table_for(&dir, 4, SortOrder::Descending);
    let second = table_for(&dir, 4, SortOrder::Descending);

    assert_eq!(first.len(), 20);
    assert_eq!(first, second);
}

#[test]
fn test_table_independent_of_thread_count() {
    let dir = populated_tree();

    let single = table_for(&dir, 1, SortOrder::Ascending);
    for threads in [2, 3, 8] {
        assert_eq!(single, table_for(&dir, threads, SortOrder::Ascending));
    }
}

#[test]
fn test_sort_direction_is_monotonic() {
    let dir = populated_tree();

    let desc = table_for(&dir, 4, SortOrder::Descending);
    let desc_sizes: Vec<u64> = desc.iter().map(|(_, a)| a.size).collect();
    assert!(desc_sizes.windows(2).all(|w| w[0] >= w[1]));

    let asc = table_for(&dir, 4, SortOrder::Ascending);
    let asc_sizes: Vec<u64> = asc.iter().map(|(_, a)| a.size).collect();
    assert!(asc_sizes.windows(2).all(|w| w[0] <= w[1]));

    assert_eq!(desc_sizes.first(), Some(&12));
    assert_eq!(asc_sizes.first(), Some(&4));
}
