use crate::error::{IssuerError, IssuerErrorExt};
use certchain_kernel::domain::{CredentialId, CredentialRecord, Principal};
use certchain_registry::InstitutionDirectory;
use certchain_storage::{KeyValueStore, KeyValueStoreExt, WriteBatch};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Table holding the single counter cell.
pub const COUNTER_TABLE: &str = "issuer_counter";
pub const COUNTER_KEY: &[u8] = b"counter";
/// Table of credential records, keyed by big-endian credential id.
pub const CREDENTIALS_TABLE: &str = "issuer_credentials";

/// The credential ledger: an auto-incrementing id → record map.
///
/// Like the registry, state is held in memory and written through to the store.
/// An issuance writes the counter bump and the new record in one batch.
#[derive(Debug)]
pub struct CredentialIssuer<S> {
    store: S,
    counter: u64,
    credentials: BTreeMap<CredentialId, CredentialRecord>,
}

impl<S: KeyValueStore> CredentialIssuer<S> {
    /// Loads the ledger from `store`. An empty store starts with no credentials.
    ///
    /// # Errors
    /// Returns [`IssuerError::Storage`] if the store cannot be read and
    /// [`IssuerError::Internal`] if persisted keys are malformed or a record sits
    /// beyond the persisted counter.
    pub fn open(store: S) -> Result<Self, IssuerError> {
        let counter = store
            .get_value::<u64>(COUNTER_TABLE, COUNTER_KEY)
            .context("Failed to load credential counter")?
            .unwrap_or(0);

        let mut credentials = BTreeMap::new();
        for (key, record) in store
            .scan_values::<CredentialRecord>(CREDENTIALS_TABLE)
            .context("Failed to load credentials")?
        {
            let bytes = <[u8; 8]>::try_from(key.as_slice()).map_err(|_| IssuerError::Internal {
                message: format!("{} byte credential key", key.len()).into(),
                context: Some("Credential keys must be 8 bytes".into()),
            })?;
            let id = CredentialId::from_key(bytes);
            if id.get() == 0 || id.get() > counter {
                return Err(IssuerError::Internal {
                    message: format!("credential {id} with counter at {counter}").into(),
                    context: Some("Persisted credential is outside the allocated range".into()),
                });
            }
            credentials.insert(id, record);
        }

        info!(counter, credentials = credentials.len(), "Credential issuer loaded");
        Ok(Self { store, counter, credentials })
    }

    /// The most recently allocated id, or `0` before the first issuance.
    #[must_use]
    pub const fn counter(&self) -> u64 {
        self.counter
    }

    /// Issues a new active credential from `sender` to `student`.
    ///
    /// `directory` is consulted read-only to check that `sender` is verified.
    /// Ids start at 1 and increase by one per successful issuance; a failed call
    /// never consumes an id.
    ///
    /// # Errors
    /// * [`IssuerError::NotVerified`] if `sender` is not a verified institution.
    /// * [`IssuerError::Storage`] if the write fails.
    /// * [`IssuerError::Internal`] if the id space is exhausted.
    pub fn issue_credential(
        &mut self,
        directory: &impl InstitutionDirectory,
        sender: &Principal,
        student: &Principal,
        metadata: impl Into<String>,
    ) -> Result<CredentialId, IssuerError> {
        if !directory.is_verified_institution(sender) {
            return rejected(IssuerError::NotVerified { sender: sender.clone(), context: None });
        }

        let next = self.counter.checked_add(1).ok_or("Credential counter exhausted")?;
        let id = CredentialId::new(next);
        let record = CredentialRecord::issued(sender.clone(), student.clone(), metadata);

        let mut batch = WriteBatch::new();
        batch.put_value(COUNTER_TABLE, COUNTER_KEY, &next)?;
        batch.put_value(CREDENTIALS_TABLE, id.to_key(), &record)?;
        self.store.apply(batch).context("Failed to persist credential")?;

        self.counter = next;
        self.credentials.insert(id, record);
        info!(%id, issuer = %sender, %student, "Credential issued");
        Ok(id)
    }

    /// Revokes credential `id`. Only its issuer may do so.
    ///
    /// Revoking an already revoked credential succeeds without writing anything.
    ///
    /// # Errors
    /// Checked in order:
    /// * [`IssuerError::NotFound`] if `id` was never issued.
    /// * [`IssuerError::NotAuthorized`] if `sender` is not the issuer.
    /// * [`IssuerError::Storage`] if the write fails.
    pub fn revoke_credential(
        &mut self,
        sender: &Principal,
        id: CredentialId,
    ) -> Result<(), IssuerError> {
        let Some(record) = self.credentials.get(&id) else {
            return rejected(IssuerError::NotFound { id, context: None });
        };
        if !record.is_issued_by(sender) {
            return rejected(IssuerError::NotAuthorized {
                sender: sender.clone(),
                id,
                context: None,
            });
        }
        if !record.is_active() {
            debug!(%id, "Credential already revoked");
            return Ok(());
        }

        let mut revoked = record.clone();
        revoked.revoke();

        let mut batch = WriteBatch::new();
        batch.put_value(CREDENTIALS_TABLE, id.to_key(), &revoked)?;
        self.store.apply(batch).context("Failed to persist revocation")?;

        self.credentials.insert(id, revoked);
        info!(%id, issuer = %sender, "Credential revoked");
        Ok(())
    }

    /// The current record of credential `id`.
    ///
    /// # Errors
    /// Returns [`IssuerError::NotFound`] if `id` was never issued.
    pub fn get_credential(&self, id: CredentialId) -> Result<&CredentialRecord, IssuerError> {
        self.credentials.get(&id).ok_or(IssuerError::NotFound { id, context: None })
    }
}

fn rejected<T>(err: IssuerError) -> Result<T, IssuerError> {
    warn!(code = err.code(), error = %err, "Issuer call rejected");
    Err(err)
}
