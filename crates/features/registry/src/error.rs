use certchain_kernel::domain::Principal;
use certchain_storage::StorageError;
use std::borrow::Cow;

/// Failures of registry operations. Codes are stable and part of the public contract.
#[certchain_derive::certchain_error]
pub enum RegistryError {
    /// The caller is not the current admin.
    #[code(100)]
    #[error("Caller is not the registry admin{}: {caller}", format_context(.context))]
    NotAuthorized { caller: Principal, context: Option<Cow<'static, str>> },

    #[code(101)]
    #[error("Institution is already verified{}: {institution}", format_context(.context))]
    AlreadyVerified { institution: Principal, context: Option<Cow<'static, str>> },

    #[code(102)]
    #[error("Institution is not in the verified set{}: {institution}", format_context(.context))]
    NotFound { institution: Principal, context: Option<Cow<'static, str>> },

    /// The durable write or the initial load failed. Nothing was changed.
    #[code(500)]
    #[error("Registry storage failure{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    /// Persisted state that cannot be interpreted.
    #[code(500)]
    #[error("Internal registry error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
