//! Build context
//!
//! One value per build that owns the query repository and the remote
//! resource fetcher. The rendering pipeline receives it explicitly and calls
//! [`BuildContext::teardown`] once the build has finished.

use crate::cache::{CacheKind, CacheManager, CacheStrategy};
use crate::config::SiteConfig;
use crate::errors::Result;
use crate::rdf::Row;
use crate::remote::RemoteResources;
use crate::sparql::{QueryArg, QueryIndex, Repository};
use serde_json::Value;
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub struct BuildContext {
    repository: Repository,
    resources: RemoteResources,
}

impl BuildContext {
    /// Wire up both caches, the query index and the repository
    ///
    /// # Arguments
    /// * `config` - Parsed site configuration
    /// * `root` - Snowman directory holding caches and ledgers
    /// * `queries_dir` - Directory of query documents
    /// * `strategy` - Cache strategy applied to both caches
    pub fn open(
        config: &SiteConfig,
        root: impl AsRef<Path>,
        queries_dir: impl AsRef<Path>,
        strategy: CacheStrategy,
    ) -> Result<Self> {
        let root = root.as_ref();

        let queries = QueryIndex::load(queries_dir)?;
        let sparql_cache = CacheManager::new(CacheKind::Sparql, strategy, root)?;
        let resources_cache = CacheManager::new(CacheKind::Resources, strategy, root)?;

        info!(
            endpoint = %config.client.endpoint,
            queries = queries.len(),
            strategy = %strategy,
            "Opened build context"
        );

        Ok(Self {
            repository: Repository::new(&config.client, queries, sparql_cache)?,
            resources: RemoteResources::new(resources_cache)?,
        })
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn resources(&self) -> &RemoteResources {
        &self.resources
    }

    /// SELECT rows for a query location
    pub fn query(&mut self, location: &str, args: &[QueryArg]) -> Result<Vec<Row>> {
        self.repository.query_select(location, args)
    }

    /// JSON-LD document for a CONSTRUCT query location
    pub fn construct(&mut self, location: &str, args: &[QueryArg]) -> Result<Value> {
        self.repository.query_construct(location, args)
    }

    pub fn get_remote(&mut self, url: &str) -> Result<String> {
        self.resources.get_remote(url)
    }

    /// Flush both ledgers; consumes the context
    pub fn teardown(self) -> Result<()> {
        self.repository.teardown()?;
        self.resources.teardown()
    }
}
