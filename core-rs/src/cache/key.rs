//! Content-addressed cache keys

use crate::errors::{Result, SparqlCacheError};
use reqwest::Url;
use sha2::{Digest, Sha256};
use std::fmt;

/// Lowercase hex SHA-256 of a string
///
/// # Example
///
/// ```
/// use sparql_cache::cache::hash;
///
/// assert_eq!(
///     hash("abc"),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn hash(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

/// Two-level cache key: `<dir>/<file>`
///
/// `dir` hashes the resource identity (query location or hostname), `file`
/// hashes the exact request (resolved query text or full URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    dir: String,
    file: String,
}

impl CacheKey {
    /// Key for a resource identifier and the request sent for it
    pub fn new(resource_id: &str, request: &str) -> Self {
        Self {
            dir: hash(resource_id),
            file: hash(request),
        }
    }

    /// Key for a remote URL: hostname hash / full URL hash
    pub fn for_url(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|e| SparqlCacheError::InvalidUrl(format!("{}: {}", url, e)))?;
        let hostname = parsed.host_str().unwrap_or_default();

        Ok(Self {
            dir: hash(hostname),
            file: hash(url),
        })
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn file(&self) -> &str {
        &self.file
    }
}

/// Ledger form: `<dir>/<file>`
impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.dir, self.file)
    }
}
