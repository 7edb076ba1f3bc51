//! Durable key-value storage with atomic batches.
//!
//! Every component of the ledger persists its state through the [`KeyValueStore`]
//! trait: point lookups, ordered table scans, and [`WriteBatch`]es that land as one
//! atomic unit. Two backends are provided:
//!
//! - **[`MemoryStore`]**: process-local tables behind a single lock. Used by tests and
//!   ephemeral runs.
//! - **[`FileStore`]**: one file per entry inside a sandboxed root directory.
//!
//! # File backend features
//!
//! - **Sandbox Security**: table names are validated and every path is checked
//!   against the canonical root, including symlinked parents.
//! - **Atomic Writes**: unique temp write + `fsync` + `rename` per entry.
//! - **Atomic Batches**: an undo journal rolls back a batch that failed or was cut
//!   short by a crash.
//! - **Transparent Compression**: optional LZ4 block compression.
//! - **Sharding**: hex-encoded keys are spread over two directory levels.
//! - **Self-Healing**: orphaned temp files are purged when the store is opened.
//! - **Single Owner**: a root is locked while a handle to it is open, and remembers
//!   the compression mode it was created with.
//!
//! # Examples
//!
//! ```rust
//! use certchain_storage::{KeyValueStore, KeyValueStoreExt, MemoryStore, WriteBatch};
//!
//! let store = MemoryStore::new();
//!
//! let mut batch = WriteBatch::new();
//! batch.put_value("counters", b"next", &2u64)?;
//! batch.put_value("records", 1u64.to_be_bytes(), "first")?;
//! store.apply(batch)?;
//!
//! let next: Option<u64> = store.get_value("counters", b"next")?;
//! assert_eq!(next, Some(2));
//! assert_eq!(store.scan("records")?.len(), 1);
//! # Ok::<(), certchain_storage::StorageError>(())
//! ```

mod batch;
mod builder;
mod codec;
mod engine;
mod error;
mod journal;
mod maintenance;
mod memory;
mod root;
mod security;
mod store;
mod table;

pub use batch::{BatchOp, WriteBatch};
pub use builder::FileStoreBuilder;
pub use engine::{Compression, FileStore};
pub use error::{StorageError, StorageErrorExt};
pub use memory::MemoryStore;
pub use store::{KeyValueStore, KeyValueStoreExt};
pub use table::MAX_KEY_LEN;
