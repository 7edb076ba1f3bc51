//! # Domain Models
//!
//! This crate contains pure ledger types with a single dependency (`serde`).
//! Keep it lean: no I/O, storage, or authorization logic. Just principals,
//! credential records, and configuration models.

pub mod config;
pub mod credential;
pub mod principal;

pub use credential::{CredentialId, CredentialRecord};
pub use principal::Principal;
