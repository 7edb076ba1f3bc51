//! # Institution Registry
//!
//! The leaf slice of the ledger. It owns two pieces of state:
//!
//! * the **admin**: exactly one principal at any time, set from the genesis
//!   configuration on first open and changed only by [`InstitutionRegistry::transfer_admin`];
//! * the **verified-institution set**: principals allowed to issue credentials.
//!
//! Every mutating call is admin-only and checks authorization before membership.
//! Rejected calls change nothing.
//!
//! ```rust
//! use certchain_kernel::domain::Principal;
//! use certchain_registry::InstitutionRegistry;
//! use certchain_storage::MemoryStore;
//!
//! let admin = Principal::from("ST1ADMIN");
//! let university = Principal::from("ST2UNIVERSITY");
//!
//! let mut registry = InstitutionRegistry::open(MemoryStore::new(), admin.clone())?;
//! registry.add_institution(&admin, &university)?;
//! assert!(registry.is_verified_institution(&university));
//!
//! let err = registry.add_institution(&university, &university).unwrap_err();
//! assert_eq!(err.code(), 100);
//! # Ok::<(), certchain_registry::RegistryError>(())
//! ```

mod directory;
mod error;
mod registry;

pub use crate::directory::InstitutionDirectory;
pub use crate::error::{RegistryError, RegistryErrorExt};
pub use crate::registry::{
    ADMIN_KEY, ADMIN_TABLE, INSTITUTIONS_TABLE, InstitutionRegistry, institution_key,
};
