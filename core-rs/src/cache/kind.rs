//! Cache kinds and cache-use strategies

use crate::errors::SparqlCacheError;
use std::fmt;
use std::str::FromStr;

/// Which cache a manager owns
///
/// Each kind has its own directory, file suffix and ledger file, so the
/// two managers never see each other's entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// SPARQL responses, keyed by query location + resolved query text
    Sparql,
    /// Remote resources, keyed by hostname + full URL
    Resources,
}

impl CacheKind {
    /// Directory name under `<root>/cache/`
    pub fn dir_name(&self) -> &'static str {
        match self {
            CacheKind::Sparql => "sparql",
            CacheKind::Resources => "resources",
        }
    }

    /// Suffix appended to each stored entry
    pub fn suffix(&self) -> &'static str {
        match self {
            CacheKind::Sparql => ".json",
            CacheKind::Resources => ".txt",
        }
    }

    /// Ledger file name under `<root>/`
    pub fn ledger_file(&self) -> &'static str {
        match self {
            CacheKind::Sparql => "last_build_queries.txt",
            CacheKind::Resources => "last_build_resources.txt",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// When persisted cache entries may be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheStrategy {
    /// Read entries when present, write on miss
    #[default]
    Available,
    /// Always miss; never read or write entries (ledger is still recorded)
    Never,
}

impl FromStr for CacheStrategy {
    type Err = SparqlCacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(CacheStrategy::Available),
            "never" => Ok(CacheStrategy::Never),
            other => Err(SparqlCacheError::Config(format!(
                "Unknown cache strategy '{}', expected 'available' or 'never'",
                other
            ))),
        }
    }
}

impl fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheStrategy::Available => write!(f, "available"),
            CacheStrategy::Never => write!(f, "never"),
        }
    }
}
