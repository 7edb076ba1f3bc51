use certchain_storage::*;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

fn file_store(temp: &TempDir) -> FileStore {
    FileStore::builder().root(temp.path().join("data")).open().unwrap()
}

#[test]
fn test_missing_keys_are_none() {
    let temp = TempDir::new().unwrap();
    let file = file_store(&temp);
    let memory = MemoryStore::new();

    assert_eq!(file.get("empty", b"nope").unwrap(), None);
    assert_eq!(memory.get("empty", b"nope").unwrap(), None);
    assert!(file.scan("empty").unwrap().is_empty());
    assert!(memory.scan("empty").unwrap().is_empty());
}

#[test]
fn test_put_get_delete_on_both_backends() {
    let temp = TempDir::new().unwrap();
    let backends: Vec<Box<dyn KeyValueStore>> =
        vec![Box::new(MemoryStore::new()), Box::new(file_store(&temp))];

    for store in backends {
        let mut batch = WriteBatch::new();
        batch.put("t", b"alpha", b"1".to_vec()).put("t", b"beta", b"2".to_vec());
        store.apply(batch).unwrap();
        assert_eq!(store.get("t", b"alpha").unwrap().as_deref(), Some(&b"1"[..]));

        let mut batch = WriteBatch::new();
        batch.delete("t", b"alpha").delete("t", b"never-written");
        store.apply(batch).unwrap();

        assert_eq!(store.get("t", b"alpha").unwrap(), None);
        assert_eq!(store.scan("t").unwrap(), vec![(b"beta".to_vec(), b"2".to_vec())]);
    }
}

#[test]
fn test_scan_is_ordered_by_key_bytes() {
    let temp = TempDir::new().unwrap();
    let store = file_store(&temp);

    let mut batch = WriteBatch::new();
    for id in [3u64, 1, 256, 2] {
        batch.put_value("records", id.to_be_bytes(), &id).unwrap();
    }
    store.apply(batch).unwrap();

    let ids: Vec<u64> =
        store.scan_values::<u64>("records").unwrap().into_iter().map(|(_, v)| v).collect();
    assert_eq!(ids, vec![1, 2, 3, 256]);
}

#[test]
fn test_later_ops_on_same_key_win() {
    let store = MemoryStore::new();
    let mut batch = WriteBatch::new();
    batch.put("t", b"k", b"first".to_vec()).put("t", b"k", b"second".to_vec());
    store.apply(batch).unwrap();
    assert_eq!(store.get("t", b"k").unwrap().as_deref(), Some(&b"second"[..]));
}

#[test]
fn test_file_store_survives_reopen() {
    let temp = TempDir::new().unwrap();
    {
        let store = file_store(&temp);
        let mut batch = WriteBatch::new();
        batch.put_value("settings", b"owner", "ST1ADMIN").unwrap();
        batch.put_value("counters", b"next", &42u64).unwrap();
        store.apply(batch).unwrap();
    }

    let store = file_store(&temp);
    assert_eq!(store.get_value::<String>("settings", b"owner").unwrap().as_deref(), Some("ST1ADMIN"));
    assert_eq!(store.get_value::<u64>("counters", b"next").unwrap(), Some(42));
}

#[test]
fn test_compressed_values_roundtrip() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::builder()
        .root(temp.path().join("lz4"))
        .compression(Compression::Lz4)
        .open()
        .unwrap();

    let payload = vec![7u8; 4096];
    let mut batch = WriteBatch::new();
    batch.put("blobs", b"big", payload.clone());
    store.apply(batch).unwrap();

    let on_disk = fs::read(store.resolve("blobs", b"big").unwrap()).unwrap();
    assert!(on_disk.len() < payload.len());
    assert_eq!(store.get("blobs", b"big").unwrap(), Some(payload));
}

#[test]
fn test_invalid_table_rejects_whole_batch() {
    let temp = TempDir::new().unwrap();
    let store = file_store(&temp);

    let mut batch = WriteBatch::new();
    batch.put("good", b"k", b"v".to_vec()).put("../escape", b"k", b"v".to_vec());

    assert!(matches!(store.apply(batch), Err(StorageError::InvalidTable { .. })));
    assert_eq!(store.get("good", b"k").unwrap(), None);
    assert!(matches!(store.get("Bad Table", b"k"), Err(StorageError::InvalidTable { .. })));
}

#[test]
fn test_oversized_key_is_rejected_by_both_backends() {
    let temp = TempDir::new().unwrap();
    let key = vec![1u8; MAX_KEY_LEN + 1];

    for store in [Box::new(MemoryStore::new()) as Box<dyn KeyValueStore>, Box::new(file_store(&temp))]
    {
        let mut batch = WriteBatch::new();
        batch.put("t", &key, b"v".to_vec());
        assert!(matches!(store.apply(batch), Err(StorageError::InvalidKey { .. })));
    }
}

#[test]
fn test_failed_batch_is_rolled_back() {
    let temp = TempDir::new().unwrap();
    let store = file_store(&temp);

    let mut batch = WriteBatch::new();
    batch.put("t", b"a", b"old".to_vec());
    store.apply(batch).unwrap();

    // A directory where the entry for `b` belongs makes the batch fail.
    let blocked = store.resolve("t", b"b").unwrap();
    fs::create_dir_all(blocked.join("occupied")).unwrap();

    let mut batch = WriteBatch::new();
    batch.put("t", b"a", b"new".to_vec()).put("t", b"b", b"x".to_vec());
    assert!(matches!(store.apply(batch), Err(StorageError::Io { .. })));

    assert_eq!(store.get("t", b"a").unwrap().as_deref(), Some(&b"old"[..]));
    assert!(!store.root().join("journal.undo").exists());
}

#[test]
fn test_open_without_create_requires_root() {
    let temp = TempDir::new().unwrap();
    let result = FileStore::builder().root(temp.path().join("missing")).create(false).open();
    assert!(matches!(result, Err(StorageError::DirectoryNotFound { .. })));
}

#[test]
fn test_second_open_of_a_live_root_is_refused() {
    let temp = TempDir::new().unwrap();
    let first = file_store(&temp);
    let clone = first.clone();

    let second = FileStore::builder().root(temp.path().join("data")).open();
    assert!(matches!(second, Err(StorageError::Locked { .. })));

    drop(first);
    let still_held = FileStore::builder().root(temp.path().join("data")).open();
    assert!(matches!(still_held, Err(StorageError::Locked { .. })));

    let mut batch = WriteBatch::new();
    batch.put_value("counters", b"next", &1u64).unwrap();
    clone.apply(batch).unwrap();
    drop(clone);

    let reopened = file_store(&temp);
    assert_eq!(reopened.get_value::<u64>("counters", b"next").unwrap(), Some(1));
}

#[test]
fn test_compression_mode_is_fixed_per_root() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("lz4");
    {
        let store = FileStore::builder().root(&root).compression(Compression::Lz4).open().unwrap();
        let mut batch = WriteBatch::new();
        batch.put_value("issuer_counter", b"counter", &7u64).unwrap();
        store.apply(batch).unwrap();
    }

    let plain = FileStore::builder().root(&root).open();
    assert!(matches!(plain, Err(StorageError::FormatMismatch { .. })));

    let store = FileStore::builder().root(&root).compression(Compression::Lz4).open().unwrap();
    assert_eq!(store.get_value::<u64>("issuer_counter", b"counter").unwrap(), Some(7));
}

#[test]
fn test_root_markers_stay_out_of_scans() {
    let temp = TempDir::new().unwrap();
    let store = file_store(&temp);
    assert!(store.root().join("store.lock").exists());
    assert!(store.root().join("store.format").exists());

    let mut batch = WriteBatch::new();
    batch.put("store", b"k", b"v".to_vec());
    store.apply(batch).unwrap();
    assert_eq!(store.scan("store").unwrap(), vec![(b"k".to_vec(), b"v".to_vec())]);
}

#[test]
fn test_clones_share_state() {
    let store = MemoryStore::new();
    let clone = store.clone();
    let mut batch = WriteBatch::new();
    batch.put("t", b"k", b"v".to_vec());
    clone.apply(batch).unwrap();
    assert!(store.get("t", b"k").unwrap().is_some());
}

#[cfg(unix)]
#[test]
fn test_symlinked_table_is_rejected() {
    let temp = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    let store = file_store(&temp);

    std::os::unix::fs::symlink(outside.path(), store.root().join("linked")).unwrap();

    let mut batch = WriteBatch::new();
    batch.put("linked", b"k", b"v".to_vec());
    assert!(matches!(store.apply(batch), Err(StorageError::PathTraversalAttempt { .. })));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_file_backend_matches_memory_backend(
        ops in prop::collection::vec(
            (any::<bool>(), prop::collection::vec(any::<u8>(), 0..6), prop::collection::vec(any::<u8>(), 0..16)),
            1..24,
        )
    ) {
        let temp = TempDir::new().unwrap();
        let file = file_store(&temp);
        let memory = MemoryStore::new();
        let mut model = BTreeMap::new();

        for chunk in ops.chunks(3) {
            let mut batch = WriteBatch::new();
            for (is_put, key, value) in chunk {
                if *is_put {
                    batch.put("t", key, value.clone());
                    model.insert(key.clone(), value.clone());
                } else {
                    batch.delete("t", key);
                    model.remove(key);
                }
            }
            file.apply(batch.clone()).unwrap();
            memory.apply(batch).unwrap();
        }

        let expected: Vec<_> = model.into_iter().collect();
        prop_assert_eq!(file.scan("t").unwrap(), expected.clone());
        prop_assert_eq!(memory.scan("t").unwrap(), expected);
    }
}
