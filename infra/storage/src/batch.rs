use crate::codec;
use crate::error::StorageError;
use crate::table::{validate_key, validate_table};
use serde::{Deserialize, Serialize};

/// A single mutation inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchOp {
    Put { table: String, key: Vec<u8>, value: Vec<u8> },
    Delete { table: String, key: Vec<u8> },
}

impl BatchOp {
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::Put { table, .. } | Self::Delete { table, .. } => table,
        }
    }

    #[must_use]
    pub fn key(&self) -> &[u8] {
        match self {
            Self::Put { key, .. } | Self::Delete { key, .. } => key,
        }
    }

    /// Rejects the operation if its table or key cannot be stored by any backend.
    pub(crate) fn validate(&self) -> Result<(), StorageError> {
        validate_table(self.table())?;
        validate_key(self.key())
    }
}

/// An ordered set of mutations applied as one atomic unit.
///
/// Either every operation becomes visible or none does. Later operations on the
/// same key win.
///
/// # Example
///
/// ```rust
/// use certchain_storage::{KeyValueStore, MemoryStore, WriteBatch};
///
/// let store = MemoryStore::new();
/// let mut batch = WriteBatch::new();
/// batch.put_value("counters", b"next", &7u64)?;
/// batch.delete("pending", b"job-1");
/// store.apply(batch)?;
/// # Ok::<(), certchain_storage::StorageError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages raw bytes under `key`.
    pub fn put(&mut self, table: &str, key: impl AsRef<[u8]>, value: Vec<u8>) -> &mut Self {
        self.ops.push(BatchOp::Put {
            table: table.to_owned(),
            key: key.as_ref().to_vec(),
            value,
        });
        self
    }

    /// Stages a serde value under `key`, encoded with `postcard`.
    ///
    /// # Errors
    /// Returns [`StorageError::Codec`] if the value cannot be encoded.
    pub fn put_value<T: Serialize + ?Sized>(
        &mut self,
        table: &str,
        key: impl AsRef<[u8]>,
        value: &T,
    ) -> Result<&mut Self, StorageError> {
        let bytes = codec::encode(value)?;
        Ok(self.put(table, key, bytes))
    }

    /// Stages removal of `key`. Removing an absent key is not an error.
    pub fn delete(&mut self, table: &str, key: impl AsRef<[u8]>) -> &mut Self {
        self.ops.push(BatchOp::Delete { table: table.to_owned(), key: key.as_ref().to_vec() });
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn ops(&self) -> impl Iterator<Item = &BatchOp> {
        self.ops.iter()
    }

    pub(crate) fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}
