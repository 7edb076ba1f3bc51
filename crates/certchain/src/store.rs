use certchain_domain::config::{StorageBackend, StorageCompression, StorageConfig};
use certchain_storage::{Compression, FileStore, KeyValueStore, MemoryStore, StorageError};
use std::sync::Arc;
use tracing::info;

/// A store handle shared by every slice of one ledger.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Opens the backend selected by `config`.
///
/// # Errors
/// Returns a [`StorageError`] if the file backend cannot be opened or recovered.
pub fn open_store(config: &StorageConfig) -> Result<SharedStore, StorageError> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Using in-memory ledger store");
            Ok(Arc::new(MemoryStore::new()))
        },
        StorageBackend::File => {
            let compression = match config.compression {
                StorageCompression::None => Compression::None,
                StorageCompression::Lz4 => Compression::Lz4,
            };
            let store =
                FileStore::builder().root(&config.data_dir).compression(compression).open()?;
            info!(root = %store.root().display(), ?compression, "Using file ledger store");
            Ok(Arc::new(store))
        },
    }
}
