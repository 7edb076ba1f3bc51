use crate::batch::{BatchOp, WriteBatch};
use crate::error::StorageError;
use crate::store::KeyValueStore;
use crate::table::{validate_key, validate_table};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

type Tables = FxHashMap<String, BTreeMap<Vec<u8>, Vec<u8>>>;

/// A process-local store. Cloning shares the same underlying tables.
///
/// Batches are applied under a single write lock, so readers see either all of a
/// batch or none of it.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        validate_table(table)?;
        validate_key(key)?;
        Ok(self.tables.read().get(table).and_then(|entries| entries.get(key)).cloned())
    }

    fn scan(&self, table: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        validate_table(table)?;
        Ok(self
            .tables
            .read()
            .get(table)
            .map(|entries| entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    fn apply(&self, batch: WriteBatch) -> Result<(), StorageError> {
        for op in batch.ops() {
            op.validate()?;
        }

        let mut tables = self.tables.write();
        let len = batch.len();
        for op in batch.into_ops() {
            match op {
                BatchOp::Put { table, key, value } => {
                    tables.entry(table).or_default().insert(key, value);
                },
                BatchOp::Delete { table, key } => {
                    if let Some(entries) = tables.get_mut(&table) {
                        entries.remove(&key);
                    }
                },
            }
        }
        trace!(ops = len, "Batch applied in memory");
        Ok(())
    }
}
