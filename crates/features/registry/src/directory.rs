use certchain_kernel::domain::Principal;

/// Read-only view of the verified-institution set.
///
/// The credential issuer authorizes issuance through this trait and never
/// mutates the registry behind it.
pub trait InstitutionDirectory {
    /// Absence means unverified. Never fails.
    fn is_verified_institution(&self, institution: &Principal) -> bool;
}

impl<D: InstitutionDirectory + ?Sized> InstitutionDirectory for &D {
    fn is_verified_institution(&self, institution: &Principal) -> bool {
        (**self).is_verified_institution(institution)
    }
}
