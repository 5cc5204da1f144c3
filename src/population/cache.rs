//! Read-through cache for the population index
//!
//! The reference file changes a handful of times per year while runs happen
//! monthly, so the parsed index is kept across runs and invalidated by the
//! source file's modification time. The cache is an explicit object owned
//! by the orchestrator, never process-global state.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, info};

use crate::error::Result;
use crate::population::PopulationIndex;

#[derive(Debug)]
struct CacheEntry {
    path: PathBuf,
    modified: SystemTime,
    index: PopulationIndex,
}

/// Modification-time keyed cache around [`PopulationIndex::load`]
#[derive(Debug, Default)]
pub struct PopulationCache {
    entry: Option<CacheEntry>,
}

impl PopulationCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the index for `path`, reusing the cached parse when the file's
    /// modification time is unchanged
    ///
    /// A changed timestamp (or a different path) drops the cached entry and
    /// re-reads the file, so a detected change is never served stale.
    pub fn load(&mut self, path: &Path) -> Result<&PopulationIndex> {
        let modified = std::fs::metadata(path)?.modified()?;

        let entry = match self.entry.take() {
            Some(e) if e.path == path && e.modified == modified => {
                debug!("population index cache hit for {}", path.display());
                e
            }
            _ => {
                info!("Loading population reference from {}", path.display());
                CacheEntry {
                    path: path.to_path_buf(),
                    modified,
                    index: PopulationIndex::load(path)?,
                }
            }
        };

        Ok(&self.entry.insert(entry).index)
    }

    /// Drop any cached entry
    pub fn clear(&mut self) {
        self.entry = None;
    }
}
