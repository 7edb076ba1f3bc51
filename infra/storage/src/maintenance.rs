use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

/// Marker embedded in temporary file names by the atomic swap.
pub(crate) const TMP_MARKER: &str = ".cctmp.";

const STALE_AFTER: Duration = Duration::from_secs(300);

/// Removes temporary files abandoned by a crash mid-write, plus empty shard directories.
///
/// Best effort: failures are logged and counted, never returned.
pub(crate) fn purge_tmp(root: &Path) {
    let (removed, failed) = remove_stale(root, SystemTime::now(), STALE_AFTER);
    if removed > 0 || failed > 0 {
        info!(removed, failed, "Cleaned up temporary files");
    }
}

fn remove_stale(root: &Path, now: SystemTime, threshold: Duration) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    WalkDir::new(root)
        .contents_first(true)
        .into_iter()
        .flatten()
        .filter(|e| e.path() != root)
        .for_each(|entry| {
            let path = entry.path();

            if entry.file_type().is_file() {
                if is_tmp(&entry) && is_stale(&entry, now, threshold) {
                    match fs::remove_file(path) {
                        Ok(()) => removed += 1,
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "Failed to remove temp file");
                            failed += 1;
                        },
                    }
                }
            } else if entry.file_type().is_dir() {
                // Only succeeds for empty directories.
                let _ = fs::remove_dir(path);
            }
        });

    (removed, failed)
}

fn is_tmp(entry: &DirEntry) -> bool {
    entry.path().file_name().and_then(|name| name.to_str()).is_some_and(|n| n.contains(TMP_MARKER))
}

fn is_stale(entry: &DirEntry, now: SystemTime, threshold: Duration) -> bool {
    fs::metadata(entry.path())
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .map_or(true, |age| age > threshold)
}

/// Flushes directory entries (renames, removals) to disk. Best effort.
pub(crate) fn sync_dir(path: &Path) {
    match fs::File::open(path) {
        Ok(dir) => {
            if let Err(err) = dir.sync_all() {
                warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Directory open failed");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_tmp_files_are_removed_and_fresh_ones_kept() {
        let dir = tempfile::tempdir().unwrap();
        let shard = dir.path().join("table").join("ab");
        fs::create_dir_all(&shard).unwrap();
        fs::write(shard.join("abcd.val.cctmp.1"), b"x").unwrap();
        fs::write(shard.join("abcd.val"), b"y").unwrap();

        let later = SystemTime::now() + Duration::from_secs(10);
        let (removed, failed) = remove_stale(dir.path(), later, Duration::ZERO);
        assert_eq!((removed, failed), (1, 0));
        assert!(shard.join("abcd.val").exists());

        fs::write(shard.join("abcd.val.cctmp.2"), b"x").unwrap();
        let (removed, _) =
            remove_stale(dir.path(), SystemTime::now(), Duration::from_secs(3600));
        assert_eq!(removed, 0);
    }

    #[test]
    fn empty_shards_are_pruned() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("table").join("00").join("11");
        fs::create_dir_all(&empty).unwrap();

        remove_stale(dir.path(), SystemTime::now(), STALE_AFTER);
        assert!(!dir.path().join("table").exists());
    }
}
