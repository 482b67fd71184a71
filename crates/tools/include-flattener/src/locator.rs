//! Basename lookup via recursive directory walking.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find the first regular file named `filename` anywhere below `root`.
///
/// Entries are visited in directory-enumeration order; no sorting is applied,
/// so among several same-named files the one the walk reaches first wins.
/// `filename` is compared byte for byte against each entry's file name; a
/// separator inside it is never treated as a sub-path.
///
/// Walk errors (missing root, permission denied, entries vanishing mid-walk)
/// are logged and skipped. They are never reported to the caller, so a broken
/// tree simply yields `None`.
pub fn locate(root: &Path, filename: &OsStr) -> Option<PathBuf> {
    let walker = WalkDir::new(root).min_depth(1).follow_links(false);

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if entry.file_name() != filename {
            continue;
        }
        if is_regular_file(&entry) {
            tracing::trace!("Located {:?} at {}", filename, entry.path().display());
            return Some(entry.into_path());
        }
    }

    tracing::trace!("{:?} not found under {}", filename, root.display());
    None
}

// Symlinks are not followed during the walk, but a link that points at a
// regular file still counts as one.
fn is_regular_file(entry: &walkdir::DirEntry) -> bool {
    let ft = entry.file_type();
    if ft.is_file() {
        return true;
    }
    ft.is_symlink()
        && std::fs::metadata(entry.path())
            .map(|m| m.is_file())
            .unwrap_or(false)
}
