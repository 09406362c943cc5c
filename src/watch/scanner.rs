//! One directory listing: candidate regular files under the watched root.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::DirectoryListError;

/// List candidate files under `dir`, depth 1 unless `recursive`. Entries are
/// sorted by file name so one scan dispatches in a stable order (cross-file
/// order is still only a weak guarantee; in-file line order is the strict
/// one). A failure on the root is returned as [`DirectoryListError`] for the
/// watcher to retry next tick; failures on individual entries are logged and
/// skipped.
pub fn list_candidates(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, DirectoryListError> {
    let mut walk = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if !recursive {
        walk = walk.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walk {
        match entry {
            Ok(e) if e.file_type().is_file() => files.push(e.into_path()),
            Ok(_) => {}
            Err(err) => {
                // No path (or the root's own path) means the listing itself
                // failed; anything deeper is one skippable entry.
                if err.path().is_none_or(|p| p == dir) {
                    return Err(DirectoryListError {
                        dir: dir.to_path_buf(),
                        source: err,
                    });
                }
                log::warn!("scan: skipping entry: {}", err);
            }
        }
    }
    Ok(files)
}
