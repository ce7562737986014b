use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;

use crate::error::Result;

/// Logical root of the source tree
pub const ROOT_DIR: &str = "/";

pub const STATE_SCHEMA_VERSION: u32 = 1;

/// Resumable traversal state; the only mutable state shared across ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanState {
    #[serde(default = "schema_version")]
    pub schema_version: u32,

    /// Unix seconds of the last completed sweep; 0 forces a full rebuild
    pub last_full_scan: i64,

    /// Logical directories (ending in `/`) still to expand
    #[serde(default)]
    pub pending_directories: VecDeque<String>,

    /// Logical source files still to process
    #[serde(default)]
    pub pending_files: VecDeque<String>,

    /// Set when the output root could not be created; cleared by a full rebuild
    #[serde(default)]
    pub disabled: bool,
}

fn schema_version() -> u32 {
    STATE_SCHEMA_VERSION
}

impl Default for ScanState {
    fn default() -> Self {
        Self {
            schema_version: STATE_SCHEMA_VERSION,
            last_full_scan: 0,
            pending_directories: VecDeque::new(),
            pending_files: VecDeque::new(),
            disabled: false,
        }
    }
}

impl ScanState {
    /// Queue the root for a new sweep, keeping the committed watermark
    pub fn reset_queues(&mut self) {
        self.pending_directories.clear();
        self.pending_directories.push_back(ROOT_DIR.to_string());
        self.pending_files.clear();
    }

    pub fn is_drained(&self) -> bool {
        self.pending_directories.is_empty() && self.pending_files.is_empty()
    }

    /// Load persisted state; a missing file means no sweep has completed yet
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Written through a temporary file, then renamed into place
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let bytes = serde_json::to_vec_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}
