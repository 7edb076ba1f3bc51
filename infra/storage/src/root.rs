//! Ownership and format markers kept at the top of a file store root.

use crate::codec;
use crate::engine::{Compression, FileStore};
use crate::error::{StorageError, StorageErrorExt};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, TryLockError};
use std::path::Path;
use tracing::{debug, info};

pub(crate) const LOCK_FILE: &str = "store.lock";
pub(crate) const FORMAT_FILE: &str = "store.format";

const FORMAT_VERSION: u16 = 1;

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
struct StoreFormat {
    version: u16,
    compression: Compression,
}

/// Takes the exclusive lock on `root`. The lock lives as long as the returned file.
///
/// # Errors
/// [`StorageError::Locked`] if another handle, in this process or any other, holds it.
pub(crate) fn acquire_lock(root: &Path) -> Result<File, StorageError> {
    let path = root.join(LOCK_FILE);
    let file = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&path)
        .context(format!("Failed to open lock file: {}", path.display()))?;

    match file.try_lock() {
        Ok(()) => {
            debug!(path = %path.display(), "Storage root locked");
            Ok(file)
        },
        Err(TryLockError::WouldBlock) => Err(StorageError::Locked {
            message: root.display().to_string().into(),
            context: Some("Another handle already owns this storage root".into()),
        }),
        Err(TryLockError::Error(err)) => Err(StorageError::Io {
            source: err,
            context: Some(format!("Failed to lock: {}", path.display()).into()),
        }),
    }
}

/// Records the on-disk format of a fresh root, or checks it against an existing one.
///
/// The marker is written uncompressed so it can be read before the mode is known.
pub(crate) fn check_format(store: &FileStore) -> Result<(), StorageError> {
    let path = store.root().join(FORMAT_FILE);
    let expected = StoreFormat { version: FORMAT_VERSION, compression: store.compression };

    match fs::read(&path) {
        Ok(bytes) => {
            let found: StoreFormat = codec::decode(&bytes).context("Corrupted format marker")?;
            if found != expected {
                return Err(StorageError::FormatMismatch {
                    message: format!("{found:?}").into(),
                    context: Some(format!("Store opened as {expected:?}").into()),
                });
            }
            Ok(())
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            store.write_file_raw(&path, &codec::encode(&expected)?)?;
            info!(compression = ?store.compression, "Storage format recorded");
            Ok(())
        },
        Err(err) => Err(StorageError::Io {
            source: err,
            context: Some(format!("Failed to read format marker: {}", path.display()).into()),
        }),
    }
}
