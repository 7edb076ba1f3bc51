use crate::error::StorageError;

/// Validates a table name.
///
/// Table names become directory names in the file backend, so the same rules apply
/// to every backend: non-empty, lowercase ASCII alphanumerics or underscores.
pub(crate) fn validate_table(name: &str) -> Result<(), StorageError> {
    if name.is_empty() {
        return Err(StorageError::InvalidTable {
            message: "EMPTY".into(),
            context: Some("Table name cannot be empty".into()),
        });
    }

    if !name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
        return Err(StorageError::InvalidTable {
            message: name.to_owned().into(),
            context: Some("Table name contains illegal characters".into()),
        });
    }

    Ok(())
}

/// Longest key accepted by any backend. Keys are hex-encoded into file names on disk.
pub const MAX_KEY_LEN: usize = 120;

pub(crate) fn validate_key(key: &[u8]) -> Result<(), StorageError> {
    if key.len() > MAX_KEY_LEN {
        return Err(StorageError::InvalidKey {
            message: format!("{} bytes", key.len()).into(),
            context: Some(format!("Keys are limited to {MAX_KEY_LEN} bytes").into()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_snake_case() {
        assert!(validate_table("registry_admin").is_ok());
        assert!(validate_table("issuer_credentials_v2").is_ok());
    }

    #[test]
    fn rejects_oversized_keys() {
        assert!(validate_key(&[]).is_ok());
        assert!(validate_key(&[7; MAX_KEY_LEN]).is_ok());
        assert!(matches!(
            validate_key(&[7; MAX_KEY_LEN + 1]),
            Err(StorageError::InvalidKey { .. })
        ));
    }

    #[test]
    fn rejects_empty_and_path_like_names() {
        for bad in ["", "../etc", "a/b", "Registry", "with space", "dot.ted"] {
            assert!(
                matches!(validate_table(bad), Err(StorageError::InvalidTable { .. })),
                "{bad:?} should be rejected"
            );
        }
    }
}
