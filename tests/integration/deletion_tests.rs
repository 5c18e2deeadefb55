use dupfinder::actions::{delete_selected, DeleteConfig, NoProgress};
use dupfinder::duplicates::{AddressTable, DuplicateFinder, SortOrder};
use std::collections::BTreeSet;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_deleting_k_files_frees_k_times_size() {
    let dir = tempdir().unwrap();
    for i in 0..5 {
        fs::write(dir.path().join(format!("copy{i}")), [7u8; 64]).unwrap();
    }

    let (duplicates, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path(), SortOrder::Descending)
        .unwrap();
    let table = AddressTable::build(&duplicates);
    let selection: BTreeSet<usize> = [1, 2, 4].into_iter().collect();

    let result =
        delete_selected::<NoProgress>(&table, &selection, &DeleteConfig::default(), None);

    assert_eq!(result.bytes_freed, 3 * 64);
    for (index, address) in table.iter() {
        assert_eq!(address.path.exists(), !selection.contains(&index));
    }
}

#[test]
fn test_stale_entry_does_not_stop_batch() {
    let dir = tempdir().unwrap();
    for name in ["a", "b", "c"] {
        fs::write(dir.path().join(name), b"dup!").unwrap();
    }

    let (duplicates, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path(), SortOrder::Descending)
        .unwrap();
    let table = AddressTable::build(&duplicates);

    // Removed behind the tool's back after detection
    fs::remove_file(dir.path().join("b")).unwrap();

    let selection: BTreeSet<usize> = [0, 1, 2].into_iter().collect();
    let result =
        delete_selected::<NoProgress>(&table, &selection, &DeleteConfig::default(), None);

    assert_eq!(result.failure_count(), 1);
    assert_eq!(result.failures[0].path, dir.path().join("b"));
    assert_eq!(result.bytes_freed, 8);
    assert!(!dir.path().join("a").exists());
    assert!(!dir.path().join("c").exists());
}
