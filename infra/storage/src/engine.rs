//! File-backed store: one file per entry, atomic swaps, and an undo journal for batches.

use crate::batch::{BatchOp, WriteBatch};
use crate::builder::FileStoreBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance::{self, TMP_MARKER};
use crate::security;
use crate::store::KeyValueStore;
use crate::journal;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use walkdir::WalkDir;

/// Value encoding of a [`FileStore`]. Fixed for the lifetime of a root.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Compression {
    #[default]
    None,
    Lz4,
}

impl Compression {
    #[must_use]
    fn compress(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::None => data.to_vec(),
            Self::Lz4 => lz4_flex::compress_prepend_size(data),
        }
    }

    fn decompress(self, data: Vec<u8>) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::None => Ok(data),
            Self::Lz4 => {
                lz4_flex::decompress_size_prepended(&data).context("Lz4 decompression failed")
            },
        }
    }
}

/// The internal shared state of a [`FileStore`].
#[derive(Debug)]
pub struct FileStoreInner {
    /// The canonicalized physical path on the disk where all data is stored.
    pub(crate) root: PathBuf,
    /// Whether transparent LZ4 compression is enabled for this instance.
    pub(crate) compression: Compression,
    /// A unique counter used to generate temporary file names.
    pub(crate) tmp_counter: AtomicU64,
    /// Serializes batches issued through clones of the same handle.
    pub(crate) write_lock: Mutex<()>,
    /// Exclusive lock on the root, released when the last clone is dropped.
    pub(crate) _root_lock: fs::File,
}

/// A durable, sandboxed key-value store on the local filesystem.
///
/// Layout: `<root>/<table>/<shard>/<shard>/k<hex key>.val`, one file per entry.
///
/// - **Atomic Writes**: every entry is replaced through a unique temp file, `fsync`,
///   and `rename`, so a crash never leaves a torn value.
/// - **Atomic Batches**: batches touching more than one entry go through an undo
///   journal; see [`FileStore::apply`](KeyValueStore::apply).
/// - **Transparent Compression**: optional LZ4 block compression of values.
/// - **Self-Healing**: an unfinished batch is rolled back and stale temp files are
///   purged when the store is opened.
/// - **Single Owner**: a root is locked by the handle that opened it. Opening it
///   again while that handle (or a clone) lives fails with [`StorageError::Locked`].
///
/// The handle is reference-counted and cheap to clone.
///
/// # Example
///
/// ```rust
/// use certchain_storage::{Compression, FileStore, KeyValueStore, KeyValueStoreExt, WriteBatch};
///
/// # let tmp = tempfile::tempdir().unwrap();
/// let store = FileStore::builder()
///     .root(tmp.path().join("ledger"))
///     .compression(Compression::Lz4)
///     .open()?;
///
/// let mut batch = WriteBatch::new();
/// batch.put_value("settings", b"owner", "ST1ADMIN")?;
/// store.apply(batch)?;
///
/// let owner: Option<String> = store.get_value("settings", b"owner")?;
/// assert_eq!(owner.as_deref(), Some("ST1ADMIN"));
/// # Ok::<(), certchain_storage::StorageError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    pub(crate) inner: Arc<FileStoreInner>,
}

impl Deref for FileStore {
    type Target = FileStoreInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FileStore {
    #[must_use = "The store is not opened until you call .open()"]
    pub fn builder() -> FileStoreBuilder {
        FileStoreBuilder::new()
    }

    /// Canonical root directory of this store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    /// Physical path of `key` in `table`, validated against the sandbox.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidTable`], [`StorageError::InvalidKey`], or
    /// [`StorageError::PathTraversalAttempt`] if the entry cannot live inside the root.
    pub fn resolve(&self, table: &str, key: &[u8]) -> Result<PathBuf, StorageError> {
        security::entry_path(&self.root, table, key)
    }

    pub(crate) fn get_raw(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.resolve(table, key)?;
        self.read_file(&path)
    }

    pub(crate) fn put_raw(&self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(table, key)?;
        self.write_file(&path, value)
    }

    pub(crate) fn delete_raw(&self, table: &str, key: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(table, key)?;
        match fs::remove_file(&path) {
            Ok(()) => {},
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Failed to delete: {}", path.display()).into()),
                });
            },
        }
        if let Some(parent) = path.parent() {
            maintenance::sync_dir(parent);
        }
        debug!(path = %path.display(), "Entry deleted");
        Ok(())
    }

    /// Reads and decompresses a file. A missing file is `Ok(None)`.
    pub(crate) fn read_file(&self, path: &Path) -> Result<Option<Vec<u8>>, StorageError> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Read failed: {}", path.display()).into()),
                });
            },
        };

        self.compression.decompress(data).map(Some)
    }

    /// Writes `data` to `path` with the atomic swap pattern:
    /// 1. Data goes to a unique temporary file next to the target.
    /// 2. The temporary file is synced to hardware (`fsync`).
    /// 3. The temporary file is renamed over the target.
    /// 4. The parent directory is synced so the rename itself is durable.
    pub(crate) fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), StorageError> {
        self.write_file_raw(path, &self.compression.compress(data))
    }

    /// Same atomic swap as [`Self::write_file`], without compression.
    pub(crate) fn write_file_raw(&self, path: &Path, final_data: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create shards for {}", path.display()))?;
        }

        let temp = unique_tmp_path(path, &self.tmp_counter);

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(final_data).context("Write failed")?;
            file.sync_all().context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, path) {
            if err.kind() == std::io::ErrorKind::AlreadyExists {
                fs::remove_file(path)
                    .context(format!("Failed to replace existing file: {}", path.display()))?;
                fs::rename(&temp, path).context(format!(
                    "Atomic swap failed: {} -> {}",
                    temp.display(),
                    path.display()
                ))?;
            } else {
                let _ = fs::remove_file(&temp);
                return Err(StorageError::Io {
                    source: err,
                    context: Some(
                        format!("Atomic swap failed: {} -> {}", temp.display(), path.display())
                            .into(),
                    ),
                });
            }
        }

        if let Some(parent) = path.parent() {
            maintenance::sync_dir(parent);
        }

        debug!(path = %path.display(), "File saved atomically");
        Ok(())
    }

    fn apply_ops(&self, ops: &[BatchOp]) -> Result<(), StorageError> {
        for op in ops {
            match op {
                BatchOp::Put { table, key, value } => self.put_raw(table, key, value)?,
                BatchOp::Delete { table, key } => self.delete_raw(table, key)?,
            }
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        self.get_raw(table, key)
    }

    fn scan(&self, table: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        let dir = security::table_dir(&self.root, table)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&dir) {
            let entry = entry.map_err(|err| StorageError::Io {
                source: err.into(),
                context: Some(format!("Failed to scan table: {table}").into()),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(key) = security::key_from_entry(entry.path()) else {
                continue;
            };
            if let Some(value) = self.read_file(entry.path())? {
                entries.push((key, value));
            }
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    /// Applies `batch` atomically.
    ///
    /// A single-entry batch is one atomic swap. Larger batches first record the prior
    /// value of every affected key in the undo journal, then apply each entry, then
    /// drop the journal. If any step fails the journal is replayed immediately, so the
    /// store is left exactly as it was before the call.
    ///
    /// A journal left behind by an earlier failed rollback is replayed before the
    /// batch starts. If that replay fails the batch is refused.
    fn apply(&self, batch: WriteBatch) -> Result<(), StorageError> {
        for op in batch.ops() {
            op.validate()?;
        }
        if batch.is_empty() {
            return Ok(());
        }

        let _guard = self.write_lock.lock();
        journal::rollback(self).context("Pending batch could not be rolled back")?;
        let ops = batch.into_ops();

        if ops.len() == 1 {
            return self.apply_ops(&ops);
        }

        journal::begin(self, &ops)?;
        if let Err(err) = self.apply_ops(&ops) {
            if let Err(rollback_err) = journal::rollback(self) {
                tracing::error!(error = %rollback_err, "Rollback failed; will retry on next open");
            }
            return Err(err);
        }
        journal::commit(self)?;

        debug!(ops = ops.len(), "Batch committed");
        Ok(())
    }
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let counter = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("entry");
    target.with_file_name(format!("{file_name}{TMP_MARKER}{counter}"))
}
