//! Undo journal that makes multi-entry batches atomic on the file backend.
//!
//! Before a batch touches any entry, the previous contents of every affected key are
//! written atomically to `<root>/journal.undo`. The journal is removed only after the
//! whole batch has landed. A journal that survives (error or crash mid-batch) is rolled
//! back, so an unacknowledged batch never becomes partially visible.

use crate::batch::BatchOp;
use crate::codec;
use crate::engine::FileStore;
use crate::error::{StorageError, StorageErrorExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

pub(crate) const JOURNAL_FILE: &str = "journal.undo";

#[derive(Debug, Serialize, Deserialize)]
struct UndoEntry {
    table: String,
    key: Vec<u8>,
    prior: Option<Vec<u8>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct UndoJournal {
    entries: Vec<UndoEntry>,
}

fn journal_path(store: &FileStore) -> PathBuf {
    store.root().join(JOURNAL_FILE)
}

/// Captures the current value of every key `ops` will touch and persists it.
pub(crate) fn begin(store: &FileStore, ops: &[BatchOp]) -> Result<(), StorageError> {
    let mut entries = Vec::with_capacity(ops.len());
    for op in ops {
        let prior = store.get_raw(op.table(), op.key())?;
        entries.push(UndoEntry { table: op.table().to_owned(), key: op.key().to_vec(), prior });
    }

    let bytes = codec::encode(&UndoJournal { entries })?;
    store.write_file(&journal_path(store), &bytes)
}

/// Marks the batch committed by removing the journal.
pub(crate) fn commit(store: &FileStore) -> Result<(), StorageError> {
    let path = journal_path(store);
    fs::remove_file(&path).context(format!("Failed to clear journal: {}", path.display()))?;
    crate::maintenance::sync_dir(store.root());
    Ok(())
}

/// Restores every journaled key to its prior value, then clears the journal.
///
/// A missing journal means there is nothing to undo.
pub(crate) fn rollback(store: &FileStore) -> Result<(), StorageError> {
    let path = journal_path(store);
    let Some(bytes) = store.read_file(&path)? else {
        return Ok(());
    };
    let journal: UndoJournal = codec::decode(&bytes).context("Corrupted undo journal")?;

    // Reverse order so the earliest prior value wins when a key appears twice.
    for entry in journal.entries.iter().rev() {
        match &entry.prior {
            Some(prior) => store.put_raw(&entry.table, &entry.key, prior)?,
            None => store.delete_raw(&entry.table, &entry.key)?,
        }
    }

    warn!(entries = journal.entries.len(), "Rolled back unfinished batch");
    commit(store)?;
    debug!("Undo journal cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::WriteBatch;
    use crate::store::KeyValueStore;

    fn open(root: &std::path::Path) -> FileStore {
        FileStore::builder().root(root).open().unwrap()
    }

    #[test]
    fn interrupted_batch_is_undone_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(dir.path());

        let mut seed = WriteBatch::new();
        seed.put("t", b"kept", b"before".to_vec());
        store.apply(seed).unwrap();

        let mut batch = WriteBatch::new();
        batch.put("t", b"kept", b"after".to_vec()).put("t", b"fresh", b"new".to_vec());
        let ops = batch.into_ops();

        // Journal written and half the batch applied, then the process "dies".
        begin(&store, &ops).unwrap();
        store.put_raw("t", b"kept", b"after").unwrap();
        drop(store);

        let store = open(dir.path());
        assert_eq!(store.get("t", b"kept").unwrap().as_deref(), Some(&b"before"[..]));
        assert_eq!(store.get("t", b"fresh").unwrap(), None);
        assert!(!dir.path().join(JOURNAL_FILE).exists());
    }

    #[test]
    fn repeated_keys_restore_the_original_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(dir.path());

        let mut batch = WriteBatch::new();
        batch.put("t", b"k", b"one".to_vec()).put("t", b"k", b"two".to_vec());
        let ops = batch.into_ops();

        begin(&store, &ops).unwrap();
        store.put_raw("t", b"k", b"one").unwrap();
        store.put_raw("t", b"k", b"two").unwrap();
        rollback(&store).unwrap();

        assert_eq!(store.get("t", b"k").unwrap(), None);
    }

    #[test]
    fn pending_journal_is_replayed_before_the_next_batch() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(dir.path());

        let mut seed = WriteBatch::new();
        seed.put("counter", b"c", b"1".to_vec()).put("records", b"1", b"first".to_vec());
        store.apply(seed).unwrap();

        // A batch that died half-applied and whose rollback never ran.
        let mut failed = WriteBatch::new();
        failed.put("counter", b"c", b"2".to_vec()).put("records", b"2", b"second".to_vec());
        begin(&store, &failed.into_ops()).unwrap();
        store.put_raw("counter", b"c", b"2").unwrap();

        let mut next = WriteBatch::new();
        next.put("counter", b"c", b"2".to_vec()).put("records", b"2", b"retry".to_vec());
        let next_ops: Vec<BatchOp> = next.ops().cloned().collect();
        store.apply(next).unwrap();
        assert!(!dir.path().join(JOURNAL_FILE).exists());
        assert_eq!(store.get("records", b"2").unwrap().as_deref(), Some(&b"retry"[..]));

        // The journal of a later batch must hold the true priors, not the torn state.
        begin(&store, &next_ops).unwrap();
        store.put_raw("counter", b"c", b"9").unwrap();
        drop(store);

        let store = open(dir.path());
        assert_eq!(store.get("counter", b"c").unwrap().as_deref(), Some(&b"2"[..]));
        assert_eq!(store.get("records", b"2").unwrap().as_deref(), Some(&b"retry"[..]));
    }

    #[test]
    fn pending_journal_is_replayed_before_a_single_entry_batch() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(dir.path());

        let mut failed = WriteBatch::new();
        failed.put("t", b"a", b"1".to_vec()).put("t", b"b", b"1".to_vec());
        begin(&store, &failed.into_ops()).unwrap();
        store.put_raw("t", b"a", b"1").unwrap();

        let mut next = WriteBatch::new();
        next.put("t", b"c", b"1".to_vec());
        store.apply(next).unwrap();

        assert_eq!(store.get("t", b"a").unwrap(), None);
        assert_eq!(store.get("t", b"c").unwrap().as_deref(), Some(&b"1"[..]));
        assert!(!dir.path().join(JOURNAL_FILE).exists());
    }

    #[test]
    fn rollback_without_journal_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(dir.path());
        rollback(&store).unwrap();
    }
}
