#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the ledger crates.
//! Every slice and infrastructure crate declares its error enum through
//! [`macro@certchain_error`] so that context handling, conversions, and the stable
//! numeric error codes look the same everywhere.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! certchain-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]`.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field,
///   enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&str>` and `From<String>` implementations
///   if an `Internal` variant is present.
/// * **Stable Codes**: When variants carry `#[code(N)]`, a `const fn code(&self) -> u16`
///   is generated. Either every variant has a code or none does.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping external errors must include a `source: T` field or a field marked
///    with `#[source]`/`#[from]` (compatible with `thiserror`), plus a context field.
/// 4. Tuple or unit variants are rejected to keep error wiring explicit.
///
/// # Example
///
/// ```rust,ignore
/// use certchain_derive::certchain_error;
/// use std::borrow::Cow;
///
/// #[certchain_error]
/// pub enum RegistryError {
///     #[code(100)]
///     #[error("Caller is not the registry admin{}: {caller}", format_context(.context))]
///     NotAuthorized { caller: String, context: Option<Cow<'static, str>> },
///
///     #[code(500)]
///     #[error("Registry storage failure{}: {source}", format_context(.context))]
///     Storage { source: std::io::Error, context: Option<Cow<'static, str>> },
/// }
///
/// assert_eq!(RegistryError::from(io_err).code(), 500);
/// ```
#[proc_macro_attribute]
pub fn certchain_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
