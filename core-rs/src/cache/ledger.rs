//! Usage ledger: cache keys touched during a build
//!
//! Line-oriented file, one `<dir-hash>/<file-hash>` per line. The ledger of
//! the current run is only written at teardown and only read back by the
//! next run.

use crate::cache::key::CacheKey;
use crate::errors::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    entries: Vec<String>,
}

impl Ledger {
    /// Empty ledger that will be written to `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            entries: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record an access; duplicates are kept in order
    pub fn record(&mut self, key: &CacheKey) {
        self.entries.push(key.to_string());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Write the current entries, replacing any previous ledger
    pub fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = self.entries.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(&self.path, content)?;

        debug!(
            path = %self.path.display(),
            entries = self.entries.len(),
            "Wrote cache ledger"
        );
        Ok(())
    }

    /// Read a ledger written by a previous run
    ///
    /// A ledger that was never written reads as empty.
    pub fn read_previous(path: &Path) -> Result<Vec<String>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
