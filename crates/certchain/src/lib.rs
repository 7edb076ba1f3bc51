//! Facade crate for the certchain ledger.
//! Re-exports domain/kernel primitives and composes the registry and issuer slices.
//! Keep this crate thin: it wires slices to a store, it does not implement business logic.
//!
//! ## Usage
//! ```rust
//! use certchain::Ledger;
//! use certchain::domain::{CredentialId, Principal};
//! use certchain::storage::MemoryStore;
//!
//! let admin = Principal::from("A");
//! let institution = Principal::from("I");
//!
//! let mut ledger = Ledger::open(MemoryStore::new(), admin.clone())?;
//! ledger.add_institution(&admin, &institution)?;
//! let id = ledger.issue_credential(&institution, &Principal::from("S"), "M")?;
//! assert_eq!(id, CredentialId::FIRST);
//! # Ok::<(), certchain::LedgerError>(())
//! ```

mod error;
mod ledger;
mod store;

pub use crate::error::{LedgerError, LedgerErrorExt};
pub use crate::ledger::Ledger;
pub use crate::store::{SharedStore, open_store};
pub use certchain_domain as domain;
pub use certchain_kernel as kernel;
pub use certchain_storage as storage;

/// Feature slices composed by [`Ledger`].
pub mod features {
    pub use certchain_issuer as issuer;
    pub use certchain_registry as registry;
}
