//! Kernel utilities shared across slices and hosts.
//! Keep this crate lightweight; it re-exports the domain and provides layered config loading.
//!
//! ## Config loading
//! ```rust,no_run
//! use certchain_kernel::config::load_config;
//! use certchain_kernel::domain::config::LedgerConfig;
//!
//! let cfg: LedgerConfig = load_config(Some("certchain.toml")).unwrap();
//! println!("genesis admin: {}", cfg.genesis.admin);
//! ```
pub mod config;

pub use certchain_domain as domain;
