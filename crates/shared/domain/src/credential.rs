use crate::principal::Principal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an issued credential. Allocated from a monotonic counter starting at 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CredentialId(u64);

impl CredentialId {
    /// The first identifier handed out by an empty ledger.
    pub const FIRST: Self = Self(1);

    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Big-endian key bytes, so lexical and numeric order agree in the store.
    #[must_use]
    pub const fn to_key(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    #[must_use]
    pub const fn from_key(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }
}

impl From<u64> for CredentialId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A credential asserting a relationship between an issuing institution and a student.
///
/// `issuer`, `student`, and `metadata` are fixed at issuance. The only mutation is
/// [`CredentialRecord::revoke`], which moves the record from active to revoked.
/// There is no way back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    issuer: Principal,
    student: Principal,
    metadata: String,
    active: bool,
}

impl CredentialRecord {
    /// A freshly issued, active credential.
    #[must_use]
    pub fn issued(issuer: Principal, student: Principal, metadata: impl Into<String>) -> Self {
        Self { issuer, student, metadata: metadata.into(), active: true }
    }

    #[must_use]
    pub const fn issuer(&self) -> &Principal {
        &self.issuer
    }

    #[must_use]
    pub const fn student(&self) -> &Principal {
        &self.student
    }

    #[must_use]
    pub fn metadata(&self) -> &str {
        &self.metadata
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns `true` if `principal` is the institution that issued this credential.
    #[must_use]
    pub fn is_issued_by(&self, principal: &Principal) -> bool {
        &self.issuer == principal
    }

    /// Marks the credential revoked. Idempotent.
    pub const fn revoke(&mut self) {
        self.active = false;
    }
}
