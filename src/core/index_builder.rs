//! Category index documents, rebuilt from the output tree after every sweep.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::category::{Category, INDEX_ORDER};
use super::fs::{EntryKind, FileSystem};
use super::links::link;
use crate::error::Result;

const DOC_SUFFIX: &str = ".rst";
pub const USAGE_DOCUMENT: &str = "Usage.rst";

pub struct IndexBuilder {
    docs_dir: PathBuf,
}

/// Render the index for `category` linking every document stem in `targets`
pub fn render_index(category: Category, targets: &[String]) -> String {
    let title = category.info().index_title;
    let rule = "*".repeat(title.chars().count());

    let mut out = format!("{}\n{}\n{}\n\n.. TAGS: RST\n", rule, title, rule);
    for target in targets {
        out.push_str(&format!("- {}\n", link(target, category, false)));
    }
    out.push_str("\n*File generated by reStructured Text daemon.*\n");
    out
}

/// Replace `path` with `contents`
pub(crate) fn replace_file(fs: &dyn FileSystem, path: &Path, contents: &str) -> io::Result<()> {
    if fs.exists(path) {
        fs.remove_file(path)?;
    }
    fs.write(path, contents)
}

impl IndexBuilder {
    pub fn new(docs_dir: PathBuf) -> Self {
        Self { docs_dir }
    }

    /// Document stems currently present for `category`
    pub fn list_documents(&self, fs: &dyn FileSystem, category: Category) -> Vec<String> {
        let dir = self.docs_dir.join(category.subdirectory());
        match fs.list_entries(&dir) {
            Ok(entries) => entries
                .into_iter()
                .filter(|e| e.kind == EntryKind::File && e.name.ends_with(DOC_SUFFIX))
                .map(|e| e.name[..e.name.len() - DOC_SUFFIX.len()].to_string())
                .collect(),
            Err(e) => {
                debug!("No documents listed for {}: {}", category, e);
                Vec::new()
            }
        }
    }

    /// Write every category index, then copy the usage document if present.
    /// Returns the number of indices written.
    pub fn write_all(&self, fs: &dyn FileSystem, usage_source: &Path) -> Result<usize> {
        let mut written = 0;

        for category in INDEX_ORDER {
            let targets = self.list_documents(fs, category);
            let path = self.docs_dir.join(category.info().index_file);
            replace_file(fs, &path, &render_index(category, &targets))?;
            debug!("Wrote {} with {} entries", path.display(), targets.len());
            written += 1;
        }

        match fs.read_to_string(usage_source) {
            Ok(usage) => replace_file(fs, &self.docs_dir.join(USAGE_DOCUMENT), &usage)?,
            Err(e) => debug!("No usage document at {}: {}", usage_source.display(), e),
        }

        Ok(written)
    }
}
