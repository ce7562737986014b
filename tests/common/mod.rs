//! In-memory filesystem and clock shared by the integration tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use rstdoc::core::{Clock, DirEntry, EntryKind, FileSystem, ScanSettings, ScanState, Scheduler};

pub const SOURCE_ROOT: &str = "/mud/lib";
pub const DOCS_DIR: &str = "/mud/docs";

#[derive(Default)]
struct Tree {
    files: BTreeMap<PathBuf, (String, i64)>,
    dirs: BTreeSet<PathBuf>,
    writes: usize,
    deny_create: bool,
}

/// Cloneable handle onto one shared in-memory tree
#[derive(Clone, Default)]
pub struct MemoryFileSystem {
    tree: Arc<Mutex<Tree>>,
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, path.display().to_string())
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.tree.lock().unwrap().dirs.insert(PathBuf::from("/"));
        fs
    }

    fn add_ancestors(tree: &mut Tree, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            tree.dirs.insert(ancestor.to_path_buf());
        }
    }

    /// Add a source file at a logical path with the given modification time
    pub fn add_source(&self, logical: &str, contents: &str, modified: i64) {
        let path = rstdoc::core::resolve(Path::new(SOURCE_ROOT), logical);
        let mut tree = self.tree.lock().unwrap();
        if let Some(parent) = path.parent() {
            Self::add_ancestors(&mut tree, parent);
        }
        tree.files.insert(path, (contents.to_string(), modified));
    }

    pub fn add_dir(&self, path: &str) {
        let mut tree = self.tree.lock().unwrap();
        Self::add_ancestors(&mut tree, Path::new(path));
    }

    pub fn add_file(&self, path: &str, contents: &str) {
        let path = PathBuf::from(path);
        let mut tree = self.tree.lock().unwrap();
        if let Some(parent) = path.parent() {
            Self::add_ancestors(&mut tree, parent);
        }
        tree.files.insert(path, (contents.to_string(), 0));
    }

    pub fn read(&self, path: &str) -> Option<String> {
        self.tree
            .lock()
            .unwrap()
            .files
            .get(Path::new(path))
            .map(|(c, _)| c.clone())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.exists(Path::new(path))
    }

    /// Number of writes performed through the trait
    pub fn writes(&self) -> usize {
        self.tree.lock().unwrap().writes
    }

    /// Snapshot of every file below `prefix`
    pub fn snapshot(&self, prefix: &str) -> BTreeMap<PathBuf, String> {
        self.tree
            .lock()
            .unwrap()
            .files
            .iter()
            .filter(|(p, _)| p.starts_with(prefix))
            .map(|(p, (c, _))| (p.clone(), c.clone()))
            .collect()
    }

    /// Make every `create_dir` fail
    pub fn deny_create(&self, deny: bool) {
        self.tree.lock().unwrap().deny_create = deny;
    }
}

impl FileSystem for MemoryFileSystem {
    fn list_entries(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let tree = self.tree.lock().unwrap();
        if !tree.dirs.contains(path) {
            return Err(not_found(path));
        }

        let mut entries: Vec<DirEntry> = tree
            .dirs
            .iter()
            .filter(|d| d.parent() == Some(path))
            .map(|d| DirEntry {
                name: d.file_name().unwrap_or_default().to_string_lossy().to_string(),
                kind: EntryKind::Directory,
                modified: 0,
            })
            .chain(
                tree.files
                    .iter()
                    .filter(|(f, _)| f.parent() == Some(path))
                    .map(|(f, (_, modified))| DirEntry {
                        name: f.file_name().unwrap_or_default().to_string_lossy().to_string(),
                        kind: EntryKind::File,
                        modified: *modified,
                    }),
            )
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.tree
            .lock()
            .unwrap()
            .files
            .get(path)
            .map(|(c, _)| c.clone())
            .ok_or_else(|| not_found(path))
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let mut tree = self.tree.lock().unwrap();
        match path.parent() {
            Some(parent) if tree.dirs.contains(parent) => {}
            _ => return Err(not_found(path)),
        }
        tree.files.insert(path.to_path_buf(), (contents.to_string(), 0));
        tree.writes += 1;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.tree
            .lock()
            .unwrap()
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found(path))
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut tree = self.tree.lock().unwrap();
        if !tree.dirs.contains(path) {
            return Err(not_found(path));
        }
        tree.dirs.retain(|d| !d.starts_with(path));
        tree.files.retain(|f, _| !f.starts_with(path));
        Ok(())
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        let mut tree = self.tree.lock().unwrap();
        if tree.deny_create {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                path.display().to_string(),
            ));
        }
        Self::add_ancestors(&mut tree, path);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let tree = self.tree.lock().unwrap();
        tree.dirs.contains(path) || tree.files.contains_key(path)
    }
}

/// Clock whose time the test advances by hand
#[derive(Clone, Default)]
pub struct ManualClock(Arc<AtomicI64>);

impl ManualClock {
    pub fn at(now: i64) -> Self {
        Self(Arc::new(AtomicI64::new(now)))
    }

    pub fn set(&self, now: i64) {
        self.0.store(now, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn settings(burst_size: usize) -> ScanSettings {
    ScanSettings {
        source_root: PathBuf::from(SOURCE_ROOT),
        docs_dir: PathBuf::from(DOCS_DIR),
        usage_file: PathBuf::from("USAGE"),
        burst_size,
        source_extension: "c".to_string(),
        excluded_dirs: vec!["/log/".to_string(), "/tmp/".to_string()],
        generator_version: "rstdoc test".to_string(),
    }
}

pub fn scheduler(fs: &MemoryFileSystem, clock: &ManualClock, burst_size: usize) -> Scheduler {
    Scheduler::new(
        settings(burst_size),
        ScanState::default(),
        Box::new(fs.clone()),
        Box::new(clock.clone()),
    )
}

pub fn doc(relative: &str) -> String {
    format!("{}/{}", DOCS_DIR, relative)
}
