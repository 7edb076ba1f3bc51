use certchain_issuer::IssuerError;
use certchain_registry::RegistryError;
use certchain_storage::StorageError;
use std::borrow::Cow;

/// Any failure surfaced through the [`Ledger`](crate::Ledger) facade.
#[certchain_derive::certchain_error]
pub enum LedgerError {
    #[error("{source}{}", format_context(.context))]
    Registry { source: RegistryError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Issuer { source: IssuerError, context: Option<Cow<'static, str>> },

    #[error("Failed to open ledger store{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },
}

impl LedgerError {
    /// The stable code of the underlying component error. Storage faults are `500`.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::Registry { source, .. } => source.code(),
            Self::Issuer { source, .. } => source.code(),
            Self::Storage { .. } => 500,
        }
    }
}
