use std::path::{Path, PathBuf};

use tracing::debug;

use super::fs::{EntryKind, FileSystem};
use super::state::ScanState;

/// Map a logical path (`/std/object.c`) onto the source root
pub fn resolve(root: &Path, logical: &str) -> PathBuf {
    root.join(logical.trim_start_matches('/'))
}

/// What one directory expansion added to the queues
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Expansion {
    pub directories: usize,
    pub files: usize,
}

pub struct TreeWalker {
    source_root: PathBuf,
    /// `.c` for the default extension
    suffix: String,
    excluded_dirs: Vec<String>,
}

impl TreeWalker {
    pub fn new(source_root: PathBuf, extension: &str, excluded_dirs: Vec<String>) -> Self {
        Self {
            source_root,
            suffix: format!(".{}", extension),
            excluded_dirs,
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn is_excluded(&self, dir: &str) -> bool {
        self.excluded_dirs
            .iter()
            .any(|excluded| dir.starts_with(excluded.as_str()))
    }

    /// List `dir` and append its subdirectories and candidate files to the queues.
    /// An unreadable directory contributes nothing.
    pub fn expand(&self, fs: &dyn FileSystem, dir: &str, state: &mut ScanState) -> Expansion {
        let mut expansion = Expansion::default();

        let entries = match fs.list_entries(&resolve(&self.source_root, dir)) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Skipping unreadable directory {}: {}", dir, e);
                return expansion;
            }
        };

        for entry in entries {
            match entry.kind {
                EntryKind::Directory => {
                    let sub = format!("{}{}/", dir, entry.name);
                    if self.is_excluded(&sub) {
                        debug!("Excluded {}", sub);
                        continue;
                    }
                    state.pending_directories.push_back(sub);
                    expansion.directories += 1;
                }
                EntryKind::File => {
                    if !entry.name.ends_with(&self.suffix) {
                        continue;
                    }
                    if state.last_full_scan > 0 && entry.modified <= state.last_full_scan {
                        continue;
                    }
                    state.pending_files.push_back(format!("{}{}", dir, entry.name));
                    expansion.files += 1;
                }
            }
        }

        expansion
    }
}
