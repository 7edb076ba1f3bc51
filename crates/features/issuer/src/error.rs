use certchain_kernel::domain::{CredentialId, Principal};
use certchain_storage::StorageError;
use std::borrow::Cow;

/// Failures of issuer operations. Codes are stable and part of the public contract.
#[certchain_derive::certchain_error]
pub enum IssuerError {
    /// The sender did not issue the credential it tried to revoke.
    #[code(100)]
    #[error("Sender {sender} did not issue credential {id}{}", format_context(.context))]
    NotAuthorized { sender: Principal, id: CredentialId, context: Option<Cow<'static, str>> },

    #[code(101)]
    #[error("Sender is not a verified institution{}: {sender}", format_context(.context))]
    NotVerified { sender: Principal, context: Option<Cow<'static, str>> },

    #[code(102)]
    #[error("Credential not found{}: {id}", format_context(.context))]
    NotFound { id: CredentialId, context: Option<Cow<'static, str>> },

    /// The durable write or the initial load failed. Nothing was changed.
    #[code(500)]
    #[error("Issuer storage failure{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    /// Persisted state that cannot be interpreted, or an exhausted counter.
    #[code(500)]
    #[error("Internal issuer error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
