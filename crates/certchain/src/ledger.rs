use crate::error::LedgerError;
use crate::store::{SharedStore, open_store};
use certchain_domain::config::LedgerConfig;
use certchain_domain::{CredentialId, CredentialRecord, Principal};
use certchain_issuer::{CredentialIssuer, IssuerError};
use certchain_registry::{InstitutionRegistry, RegistryError};
use certchain_storage::KeyValueStore;

/// One trust registry: the institution registry and the credential issuer over
/// a shared store.
///
/// Mutating operations take `&mut self`, so calls on one ledger are serialized.
/// Several independent ledgers can live side by side on separate stores.
#[derive(Debug)]
pub struct Ledger<S> {
    registry: InstitutionRegistry<S>,
    issuer: CredentialIssuer<S>,
}

impl<S: KeyValueStore + Clone> Ledger<S> {
    /// Opens both slices on `store`. `genesis_admin` only applies to an empty store.
    ///
    /// # Errors
    /// Returns [`LedgerError`] if either slice fails to load its state.
    pub fn open(store: S, genesis_admin: Principal) -> Result<Self, LedgerError> {
        let registry = InstitutionRegistry::open(store.clone(), genesis_admin)?;
        let issuer = CredentialIssuer::open(store)?;
        Ok(Self { registry, issuer })
    }
}

impl Ledger<SharedStore> {
    /// Opens the store described by `config.storage` and loads the ledger from it.
    ///
    /// # Errors
    /// Returns [`LedgerError::Storage`] if the backend cannot be opened, or any
    /// error from [`Ledger::open`].
    pub fn open_from_config(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let store = open_store(&config.storage)?;
        Self::open(store, config.genesis.admin.clone())
    }
}

impl<S: KeyValueStore> Ledger<S> {
    #[must_use]
    pub const fn registry(&self) -> &InstitutionRegistry<S> {
        &self.registry
    }

    #[must_use]
    pub const fn issuer(&self) -> &CredentialIssuer<S> {
        &self.issuer
    }

    #[must_use]
    pub const fn admin(&self) -> &Principal {
        self.registry.admin()
    }

    /// See [`InstitutionRegistry::add_institution`].
    ///
    /// # Errors
    /// `NotAuthorized` (100), `AlreadyVerified` (101), or a storage fault.
    pub fn add_institution(
        &mut self,
        caller: &Principal,
        institution: &Principal,
    ) -> Result<(), RegistryError> {
        self.registry.add_institution(caller, institution)
    }

    /// See [`InstitutionRegistry::remove_institution`].
    ///
    /// # Errors
    /// `NotAuthorized` (100), `NotFound` (102), or a storage fault.
    pub fn remove_institution(
        &mut self,
        caller: &Principal,
        institution: &Principal,
    ) -> Result<(), RegistryError> {
        self.registry.remove_institution(caller, institution)
    }

    #[must_use]
    pub fn is_verified_institution(&self, institution: &Principal) -> bool {
        self.registry.is_verified_institution(institution)
    }

    /// See [`InstitutionRegistry::transfer_admin`].
    ///
    /// # Errors
    /// `NotAuthorized` (100) or a storage fault.
    pub fn transfer_admin(
        &mut self,
        caller: &Principal,
        new_admin: &Principal,
    ) -> Result<(), RegistryError> {
        self.registry.transfer_admin(caller, new_admin)
    }

    /// Issues a credential, authorized against this ledger's registry.
    ///
    /// # Errors
    /// `NotVerified` (101) or a storage fault.
    pub fn issue_credential(
        &mut self,
        sender: &Principal,
        student: &Principal,
        metadata: impl Into<String>,
    ) -> Result<CredentialId, IssuerError> {
        self.issuer.issue_credential(&self.registry, sender, student, metadata)
    }

    /// See [`CredentialIssuer::revoke_credential`].
    ///
    /// # Errors
    /// `NotFound` (102), `NotAuthorized` (100), or a storage fault.
    pub fn revoke_credential(
        &mut self,
        sender: &Principal,
        id: CredentialId,
    ) -> Result<(), IssuerError> {
        self.issuer.revoke_credential(sender, id)
    }

    /// # Errors
    /// `NotFound` (102) if `id` was never issued.
    pub fn get_credential(&self, id: CredentialId) -> Result<&CredentialRecord, IssuerError> {
        self.issuer.get_credential(id)
    }
}
