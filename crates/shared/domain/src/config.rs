use crate::principal::Principal;
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level ledger configuration shared across the host and the slices.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerConfigInner {
    pub genesis: GenesisConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    #[serde(flatten, default)]
    inner: Arc<LedgerConfigInner>,
}

impl Deref for LedgerConfig {
    type Target = LedgerConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for LedgerConfig {
    fn deref_mut(&mut self) -> &mut LedgerConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Values used only when a store is opened for the first time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenesisConfig {
    /// Admin written to an empty store. A persisted admin always takes precedence.
    pub admin: Principal,
}

/// Which key-value backend holds the ledger state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local maps; state is lost on exit.
    Memory,
    /// Sandboxed directory with atomic writes.
    #[default]
    File,
}

/// On-disk value compression for the file backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageCompression {
    #[default]
    None,
    Lz4,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
    pub compression: StorageCompression,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level directive (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
    /// Per-target directives, e.g. `certchain_issuer=debug,certchain_storage=warn`.
    /// `RUST_LOG` applies when unset.
    pub filter: Option<String>,
    pub console: bool,
    /// Enables the rolling file layer when set.
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub max_files: usize,
}

// --- Default ---

impl Default for GenesisConfig {
    fn default() -> Self {
        Self { admin: Principal::from("ST1ADMIN1234567890ADMINADDRESS") }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from("data"),
            compression: StorageCompression::None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            filter: None,
            console: true,
            dir: None,
            json: false,
            max_files: 10,
        }
    }
}
