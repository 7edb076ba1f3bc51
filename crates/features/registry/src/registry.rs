use crate::directory::InstitutionDirectory;
use crate::error::{RegistryError, RegistryErrorExt};
use certchain_kernel::domain::Principal;
use certchain_storage::{KeyValueStore, KeyValueStoreExt, WriteBatch};
use fxhash::FxHashSet;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

/// Table holding the single admin slot.
pub const ADMIN_TABLE: &str = "registry_admin";
pub const ADMIN_KEY: &[u8] = b"admin";
/// Table of verified institutions. Each entry holds the principal under its
/// [`institution_key`].
pub const INSTITUTIONS_TABLE: &str = "registry_institutions";

/// Fixed-size store key of `institution`, so principals of any length fit every backend.
#[must_use]
pub fn institution_key(institution: &Principal) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(institution.as_bytes());
    hasher.finalize().as_slice().to_vec()
}

/// The governing authority and its allowlist of verified issuing institutions.
///
/// State lives in memory and is written through to the store: every mutation is
/// persisted as one batch first and applied to memory only once the batch has
/// landed. Reads never touch the store.
#[derive(Debug)]
pub struct InstitutionRegistry<S> {
    store: S,
    admin: Principal,
    institutions: FxHashSet<Principal>,
}

impl<S: KeyValueStore> InstitutionRegistry<S> {
    /// Loads the registry from `store`.
    ///
    /// An empty store is initialized with `genesis_admin`. A store that already
    /// holds an admin keeps it and `genesis_admin` is ignored.
    ///
    /// # Errors
    /// Returns [`RegistryError::Storage`] if the store cannot be read or the genesis
    /// admin cannot be written, and [`RegistryError::Internal`] if a persisted
    /// institution is stored under a key that does not match it.
    pub fn open(store: S, genesis_admin: Principal) -> Result<Self, RegistryError> {
        let admin = match store
            .get_value::<Principal>(ADMIN_TABLE, ADMIN_KEY)
            .context("Failed to load registry admin")?
        {
            Some(admin) => admin,
            None => {
                let mut batch = WriteBatch::new();
                batch.put_value(ADMIN_TABLE, ADMIN_KEY, &genesis_admin)?;
                store.apply(batch).context("Failed to persist genesis admin")?;
                info!(admin = %genesis_admin, "Genesis admin installed");
                genesis_admin
            },
        };

        let institutions = store
            .scan_values::<Principal>(INSTITUTIONS_TABLE)
            .context("Failed to load verified institutions")?
            .into_iter()
            .map(|(key, institution)| {
                if key == institution_key(&institution) {
                    Ok(institution)
                } else {
                    Err(RegistryError::Internal {
                        message: institution.to_string().into(),
                        context: Some("Persisted institution does not match its key".into()),
                    })
                }
            })
            .collect::<Result<FxHashSet<_>, _>>()?;

        info!(%admin, institutions = institutions.len(), "Institution registry loaded");
        Ok(Self { store, admin, institutions })
    }

    /// The current admin.
    #[must_use]
    pub const fn admin(&self) -> &Principal {
        &self.admin
    }

    /// Returns `true` iff `institution` was added and not removed since.
    #[must_use]
    pub fn is_verified_institution(&self, institution: &Principal) -> bool {
        self.institutions.contains(institution)
    }

    /// Adds `institution` to the verified set.
    ///
    /// # Errors
    /// Checked in order:
    /// * [`RegistryError::NotAuthorized`] if `caller` is not the admin.
    /// * [`RegistryError::AlreadyVerified`] if `institution` is already a member.
    /// * [`RegistryError::Storage`] if the write fails.
    pub fn add_institution(
        &mut self,
        caller: &Principal,
        institution: &Principal,
    ) -> Result<(), RegistryError> {
        self.ensure_admin(caller)?;
        if self.institutions.contains(institution) {
            return rejected(RegistryError::AlreadyVerified {
                institution: institution.clone(),
                context: None,
            });
        }

        let mut batch = WriteBatch::new();
        batch.put_value(INSTITUTIONS_TABLE, &institution_key(institution), institution)?;
        self.store.apply(batch).context("Failed to persist institution")?;

        self.institutions.insert(institution.clone());
        info!(%institution, "Institution verified");
        Ok(())
    }

    /// Removes `institution` from the verified set.
    ///
    /// Credentials it already issued are left untouched.
    ///
    /// # Errors
    /// Checked in order:
    /// * [`RegistryError::NotAuthorized`] if `caller` is not the admin.
    /// * [`RegistryError::NotFound`] if `institution` is not a member.
    /// * [`RegistryError::Storage`] if the write fails.
    pub fn remove_institution(
        &mut self,
        caller: &Principal,
        institution: &Principal,
    ) -> Result<(), RegistryError> {
        self.ensure_admin(caller)?;
        if !self.institutions.contains(institution) {
            return rejected(RegistryError::NotFound {
                institution: institution.clone(),
                context: None,
            });
        }

        let mut batch = WriteBatch::new();
        batch.delete(INSTITUTIONS_TABLE, &institution_key(institution));
        self.store.apply(batch).context("Failed to remove institution")?;

        self.institutions.remove(institution);
        info!(%institution, "Institution removed");
        Ok(())
    }

    /// Hands the admin role to `new_admin`.
    ///
    /// Any principal is accepted, including the current admin.
    ///
    /// # Errors
    /// * [`RegistryError::NotAuthorized`] if `caller` is not the admin.
    /// * [`RegistryError::Storage`] if the write fails.
    pub fn transfer_admin(
        &mut self,
        caller: &Principal,
        new_admin: &Principal,
    ) -> Result<(), RegistryError> {
        self.ensure_admin(caller)?;

        let mut batch = WriteBatch::new();
        batch.put_value(ADMIN_TABLE, ADMIN_KEY, new_admin)?;
        self.store.apply(batch).context("Failed to persist admin transfer")?;

        let previous = std::mem::replace(&mut self.admin, new_admin.clone());
        info!(from = %previous, to = %new_admin, "Admin transferred");
        Ok(())
    }

    fn ensure_admin(&self, caller: &Principal) -> Result<(), RegistryError> {
        if caller == &self.admin {
            return Ok(());
        }
        rejected(RegistryError::NotAuthorized { caller: caller.clone(), context: None })
    }
}

impl<S: KeyValueStore> InstitutionDirectory for InstitutionRegistry<S> {
    fn is_verified_institution(&self, institution: &Principal) -> bool {
        self.institutions.contains(institution)
    }
}

fn rejected<T>(err: RegistryError) -> Result<T, RegistryError> {
    warn!(code = err.code(), error = %err, "Registry call rejected");
    Err(err)
}
