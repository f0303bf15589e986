//! Query index: query location -> raw query text

use crate::errors::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Default directory holding query documents
pub const DEFAULT_QUERIES_DIR: &str = "queries";

#[derive(Debug, Clone, Default)]
pub struct QueryIndex {
    queries: HashMap<String, String>,
}

impl QueryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every regular file under `dir`
    ///
    /// Locations are `/`-separated paths relative to `dir`, e.g.
    /// `countries.rq` or `country/by-id.rq`. A missing directory yields an
    /// empty index.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut index = Self::new();

        if !dir.is_dir() {
            debug!(dir = %dir.display(), "No queries directory");
            return Ok(index);
        }

        for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            let location = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let text = fs::read_to_string(entry.path())?;
            index.insert(location, text);
        }

        debug!(dir = %dir.display(), queries = index.len(), "Indexed queries");
        Ok(index)
    }

    pub fn insert(&mut self, location: impl Into<String>, text: impl Into<String>) {
        self.queries.insert(location.into(), text.into());
    }

    pub fn get(&self, location: &str) -> Option<&str> {
        self.queries.get(location).map(String::as_str)
    }

    pub fn contains(&self, location: &str) -> bool {
        self.queries.contains_key(location)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Query locations, sorted
    pub fn locations(&self) -> Vec<&str> {
        let mut locations: Vec<&str> = self.queries.keys().map(String::as_str).collect();
        locations.sort_unstable();
        locations
    }
}

impl<L: Into<String>, T: Into<String>> FromIterator<(L, T)> for QueryIndex {
    fn from_iter<I: IntoIterator<Item = (L, T)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (location, text) in iter {
            index.insert(location, text);
        }
        index
    }
}
