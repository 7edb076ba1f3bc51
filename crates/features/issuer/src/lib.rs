//! # Credential Issuer
//!
//! Verified institutions issue credentials to students; only the issuing
//! institution may revoke them. Each credential moves one way:
//!
//! ```text
//! Active --revoke (by issuer)--> Revoked
//! ```
//!
//! Issuance authorization is a read-only query against an
//! [`InstitutionDirectory`](certchain_registry::InstitutionDirectory), normally the
//! [`InstitutionRegistry`](certchain_registry::InstitutionRegistry).
//!
//! ```rust
//! use certchain_issuer::CredentialIssuer;
//! use certchain_kernel::domain::{CredentialId, Principal};
//! use certchain_registry::InstitutionRegistry;
//! use certchain_storage::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let admin = Principal::from("ST1ADMIN");
//! let university = Principal::from("ST2UNIVERSITY");
//! let student = Principal::from("ST3STUDENT");
//!
//! let mut registry = InstitutionRegistry::open(store.clone(), admin.clone())?;
//! registry.add_institution(&admin, &university)?;
//!
//! let mut issuer = CredentialIssuer::open(store)?;
//! let id = issuer.issue_credential(&registry, &university, &student, "BSc Physics")?;
//! assert_eq!(id, CredentialId::FIRST);
//!
//! issuer.revoke_credential(&university, id)?;
//! assert!(!issuer.get_credential(id)?.is_active());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod issuer;

pub use crate::error::{IssuerError, IssuerErrorExt};
pub use crate::issuer::{COUNTER_KEY, COUNTER_TABLE, CREDENTIALS_TABLE, CredentialIssuer};
