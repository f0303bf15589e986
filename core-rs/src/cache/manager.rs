//! Cache manager: content-addressed storage plus a usage ledger
//!
//! Layout under the snowman directory:
//!
//! ```text
//! <root>/cache/<kind>/<hash(resource)>/<hash(request)><suffix>
//! <root>/<ledger file>
//! ```
//!
//! Stored entries are indexed once when the manager is created. Lookups
//! consult that index instead of the filesystem, and writes keep it current.

use crate::cache::key::{hash, CacheKey};
use crate::cache::kind::{CacheKind, CacheStrategy};
use crate::cache::ledger::Ledger;
use crate::errors::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Cache manager for one [`CacheKind`]
#[derive(Debug)]
pub struct CacheManager {
    kind: CacheKind,
    strategy: CacheStrategy,
    /// `<root>/cache/<kind>`
    cache_dir: PathBuf,
    /// Ledger form of each stored key -> file path
    stored: HashMap<String, PathBuf>,
    ledger: Ledger,
}

impl CacheManager {
    /// Create a manager rooted at the snowman directory
    ///
    /// Creates the cache directory if needed and, unless the strategy is
    /// [`CacheStrategy::Never`], indexes the entries already stored.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sparql_cache::cache::{CacheKind, CacheManager, CacheStrategy};
    ///
    /// let mut cache = CacheManager::new(CacheKind::Sparql, CacheStrategy::Available, ".snowman").unwrap();
    /// if cache.get_cache("countries.rq", "SELECT ...").unwrap().is_none() {
    ///     cache.set_cache("countries.rq", "SELECT ...", "{}").unwrap();
    /// }
    /// cache.teardown().unwrap();
    /// ```
    pub fn new(kind: CacheKind, strategy: CacheStrategy, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let cache_dir = root.join("cache").join(kind.dir_name());
        fs::create_dir_all(&cache_dir)?;

        let stored = match strategy {
            CacheStrategy::Never => HashMap::new(),
            CacheStrategy::Available => index_stored_entries(&cache_dir, kind.suffix())?,
        };

        debug!(
            kind = %kind,
            strategy = %strategy,
            entries = stored.len(),
            "Initialized cache manager"
        );

        Ok(Self {
            kind,
            strategy,
            cache_dir,
            stored,
            ledger: Ledger::new(root.join(kind.ledger_file())),
        })
    }

    pub fn kind(&self) -> CacheKind {
        self.kind
    }

    pub fn strategy(&self) -> CacheStrategy {
        self.strategy
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn ledger_path(&self) -> &Path {
        self.ledger.path()
    }

    /// Keys accessed so far in this run, in order
    pub fn used_in_current_run(&self) -> &[String] {
        self.ledger.entries()
    }

    /// Number of entries known to the index
    pub fn known_entries(&self) -> usize {
        self.stored.len()
    }

    /// Path an entry is (or would be) stored at
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir
            .join(key.dir())
            .join(format!("{}{}", key.file(), self.kind.suffix()))
    }

    /// Look up `(resource_id, request)`; always recorded in the ledger
    pub fn get_cache(&mut self, resource_id: &str, request: &str) -> Result<Option<String>> {
        self.get_cache_by_key(&CacheKey::new(resource_id, request))
    }

    /// Look up a precomputed key; always recorded in the ledger
    ///
    /// Returns `None` on a miss and always under [`CacheStrategy::Never`].
    pub fn get_cache_by_key(&mut self, key: &CacheKey) -> Result<Option<String>> {
        self.ledger.record(key);

        if self.strategy == CacheStrategy::Never {
            return Ok(None);
        }

        match self.stored.get(&key.to_string()) {
            Some(path) => Ok(Some(fs::read_to_string(path)?)),
            None => Ok(None),
        }
    }

    /// Store content for `(resource_id, request)`
    pub fn set_cache(&mut self, resource_id: &str, request: &str, content: &str) -> Result<()> {
        self.set_cache_by_key(&CacheKey::new(resource_id, request), content)
    }

    /// Store content verbatim under a precomputed key
    ///
    /// No-op under [`CacheStrategy::Never`]. Later lookups in the same run hit.
    pub fn set_cache_by_key(&mut self, key: &CacheKey, content: &str) -> Result<()> {
        if self.strategy == CacheStrategy::Never {
            return Ok(());
        }

        let path = self.entry_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;

        self.stored.insert(key.to_string(), path);
        Ok(())
    }

    /// Paths not used by the previous build
    ///
    /// Walks the whole cache tree (directories and files). A path is used
    /// when its derived key equals an entry of the previous ledger or is a
    /// prefix of one, so a resource directory counts as used while any of
    /// its entries is. Nothing is deleted.
    pub fn unused_cache_paths(&self) -> Result<Vec<PathBuf>> {
        let used = Ledger::read_previous(self.ledger.path())?;

        let mut unused = Vec::new();
        for entry in WalkDir::new(&self.cache_dir).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            let derived = self.derive_key(entry.path());

            let is_used = used
                .iter()
                .any(|u| *u == derived || u.starts_with(derived.as_str()));
            if !is_used {
                unused.push(entry.into_path());
            }
        }

        Ok(unused)
    }

    /// Write this run's ledger, replacing the previous one
    ///
    /// Must run once at the end of a successful build; without it the next
    /// unused-entry computation works from stale data.
    pub fn teardown(&self) -> Result<()> {
        self.ledger.flush()
    }

    /// Number of stored files
    pub fn count_items(&self) -> Result<usize> {
        let mut count = 0;
        for entry in WalkDir::new(&self.cache_dir).min_depth(1) {
            if entry?.file_type().is_file() {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Stored files for one resource (query location or hostname), sorted
    pub fn entries_for_resource(&self, resource_id: &str) -> Result<Vec<PathBuf>> {
        let dir = self.cache_dir.join(hash(resource_id));
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() {
                paths.push(entry.into_path());
            }
        }
        Ok(paths)
    }

    /// Remove every resource directory; returns how many were removed
    pub fn clear_all(&mut self) -> Result<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.cache_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(entry.path())?;
                removed += 1;
            }
        }

        self.stored.clear();
        info!(kind = %self.kind, removed, "Cleared cache");
        Ok(removed)
    }

    /// Remove all entries for one resource; false if there were none
    pub fn clear_resource(&mut self, resource_id: &str) -> Result<bool> {
        let dir_hash = hash(resource_id);
        let dir = self.cache_dir.join(&dir_hash);
        if !dir.exists() {
            return Ok(false);
        }

        fs::remove_dir_all(&dir)?;
        let prefix = format!("{}/", dir_hash);
        self.stored.retain(|k, _| !k.starts_with(&prefix));
        Ok(true)
    }

    /// Remove one entry, and its resource directory once empty
    pub fn clear_entry(&mut self, key: &CacheKey) -> Result<bool> {
        let path = self.entry_path(key);
        self.stored.remove(&key.to_string());

        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;

        if let Some(dir) = path.parent() {
            if fs::read_dir(dir)?.next().is_none() {
                fs::remove_dir(dir)?;
            }
        }
        Ok(true)
    }

    /// Remove everything [`unused_cache_paths`](Self::unused_cache_paths) reports
    pub fn clear_unused(&mut self) -> Result<Vec<PathBuf>> {
        let unused = self.unused_cache_paths()?;

        for path in &unused {
            // A directory removed earlier in the loop takes its files with it
            if path.is_dir() {
                fs::remove_dir_all(path)?;
            } else if path.exists() {
                fs::remove_file(path)?;
            }
        }

        self.stored.retain(|_, p| p.exists());
        info!(kind = %self.kind, removed = unused.len(), "Cleared unused cache entries");
        Ok(unused)
    }

    /// Ledger form of a path inside the cache directory
    fn derive_key(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.cache_dir).unwrap_or(path);
        let joined = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        match joined.strip_suffix(self.kind.suffix()) {
            Some(stripped) => stripped.to_string(),
            None => joined,
        }
    }
}

/// Index `<dir>/<file><suffix>` entries two levels below `cache_dir`
fn index_stored_entries(cache_dir: &Path, suffix: &str) -> Result<HashMap<String, PathBuf>> {
    let mut stored = HashMap::new();

    for entry in WalkDir::new(cache_dir).min_depth(2).max_depth(2) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let dir_name = match entry.path().parent().and_then(|p| p.file_name()) {
            Some(name) => name.to_string_lossy().to_string(),
            None => continue,
        };
        let key = {
            let file_name = entry.file_name().to_string_lossy();
            let file_hash = file_name.strip_suffix(suffix).unwrap_or(&file_name);
            format!("{}/{}", dir_name, file_hash)
        };

        stored.insert(key, entry.into_path());
    }

    Ok(stored)
}
