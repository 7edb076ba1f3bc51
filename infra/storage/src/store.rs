use crate::batch::WriteBatch;
use crate::codec;
use crate::error::StorageError;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::Arc;

/// A durable associative store partitioned into named tables.
///
/// Implementations must make [`KeyValueStore::apply`] atomic: a reader never
/// observes part of a batch, and a failed batch leaves the store unchanged.
pub trait KeyValueStore: Debug + Send + Sync {
    /// Point lookup. Absence is `Ok(None)`, never an error.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidTable`] for a malformed table name, or a backend
    /// failure ([`StorageError::Io`], [`StorageError::Decompress`]).
    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Every entry of `table`, ordered by key bytes.
    ///
    /// # Errors
    /// Same as [`KeyValueStore::get`].
    fn scan(&self, table: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError>;

    /// Applies every operation of `batch` as one atomic unit.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidTable`] before anything is written if any
    /// operation names a malformed table, or a backend failure.
    fn apply(&self, batch: WriteBatch) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get(table, key)
    }

    fn scan(&self, table: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        (**self).scan(table)
    }

    fn apply(&self, batch: WriteBatch) -> Result<(), StorageError> {
        (**self).apply(batch)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get(table, key)
    }

    fn scan(&self, table: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        (**self).scan(table)
    }

    fn apply(&self, batch: WriteBatch) -> Result<(), StorageError> {
        (**self).apply(batch)
    }
}

/// Typed access on top of any [`KeyValueStore`], decoding values with `postcard`.
pub trait KeyValueStoreExt: KeyValueStore {
    /// # Errors
    /// Returns [`StorageError::Codec`] if the stored bytes do not decode as `T`.
    fn get_value<T: DeserializeOwned>(
        &self,
        table: &str,
        key: &[u8],
    ) -> Result<Option<T>, StorageError> {
        self.get(table, key)?.map(|bytes| codec::decode(&bytes)).transpose()
    }

    /// # Errors
    /// Returns [`StorageError::Codec`] if any stored value does not decode as `T`.
    fn scan_values<T: DeserializeOwned>(
        &self,
        table: &str,
    ) -> Result<Vec<(Vec<u8>, T)>, StorageError> {
        self.scan(table)?
            .into_iter()
            .map(|(key, bytes)| codec::decode(&bytes).map(|value| (key, value)))
            .collect()
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}
