use crate::error::StorageError;
use crate::table::{validate_key, validate_table};
use std::path::{Component, Path, PathBuf};

/// Extension of committed value files. Anything else inside a table directory is ignored.
pub(crate) const VALUE_EXT: &str = "val";

const KEY_PREFIX: char = 'k';

/// Directory holding every entry of `table`.
pub(crate) fn table_dir(root: &Path, table: &str) -> Result<PathBuf, StorageError> {
    validate_table(table)?;
    ensure_within(root, &root.join(table))
}

/// Physical location of `key` in `table`.
///
/// Keys are hex-encoded and sharded by their first two byte pairs, so a table with
/// many entries never piles them into a single directory:
/// `<root>/<table>/<h0h1>/<h2h3>/k<hex>.val`. The `k` prefix keeps the empty key
/// from turning into a dotfile.
pub(crate) fn entry_path(root: &Path, table: &str, key: &[u8]) -> Result<PathBuf, StorageError> {
    validate_key(key)?;
    let mut path = table_dir(root, table)?;
    let name = hex::encode(key);

    if name.len() >= 4 {
        path.push(&name[0..2]);
        path.push(&name[2..4]);
    }
    path.push(format!("{KEY_PREFIX}{name}.{VALUE_EXT}"));

    ensure_within(root, &path)
}

/// Recovers the key from a committed value file, or `None` for foreign files.
pub(crate) fn key_from_entry(path: &Path) -> Option<Vec<u8>> {
    if path.extension().and_then(|ext| ext.to_str()) != Some(VALUE_EXT) {
        return None;
    }
    let stem = path.file_stem().and_then(|stem| stem.to_str())?;
    hex::decode(stem.strip_prefix(KEY_PREFIX)?).ok()
}

fn ensure_within(root: &Path, path: &Path) -> Result<PathBuf, StorageError> {
    let relative = path.strip_prefix(root).map_err(|_| StorageError::PathTraversalAttempt {
        message: path.display().to_string().into(),
        context: Some("Path is outside sandbox boundaries".into()),
    })?;

    for component in relative.components() {
        if !matches!(component, Component::Normal(_)) {
            return Err(StorageError::PathTraversalAttempt {
                message: path.display().to_string().into(),
                context: Some("Only plain path segments are allowed in sandbox".into()),
            });
        }
    }

    validate_ancestors(root, path)?;
    Ok(path.to_path_buf())
}

/// Walks up from `path` to its first existing ancestor and verifies that ancestor is
/// physically inside `root`, so a symlinked table directory cannot redirect writes.
fn validate_ancestors(root: &Path, path: &Path) -> Result<(), StorageError> {
    let mut current = Some(path);

    while let Some(candidate) = current {
        if candidate == root {
            return Ok(());
        }

        if candidate.exists() {
            return match candidate.canonicalize() {
                Ok(canonical) if canonical.starts_with(root) => Ok(()),
                Ok(canonical) => Err(StorageError::PathTraversalAttempt {
                    message: canonical.display().to_string().into(),
                    context: Some("Existing parent directory is a symlink outside sandbox".into()),
                }),
                Err(e) => Err(StorageError::Io {
                    source: e,
                    context: Some("Failed to verify parent directory".into()),
                }),
            };
        }

        current = candidate.parent();
    }

    Err(StorageError::PathTraversalAttempt {
        message: path.display().to_string().into(),
        context: Some("No valid parent directory found within sandbox".into()),
    })
}
