//! Query repository: resolves queries and arbitrates between cache and network
//!
//! ```text
//! identifier + args
//!   -> resolve (query index + placeholder substitution)
//!   -> cache lookup keyed by (identifier, resolved text)
//!   -> miss: POST to endpoint, persist raw body
//!   -> decode (SELECT rows or JSON-LD document)
//! ```

use crate::cache::{CacheKey, CacheManager};
use crate::config::ClientConfig;
use crate::errors::{Result, SparqlCacheError};
use crate::rdf::{decode_results, Row};
use crate::sparql::args::{substitute, QueryArg};
use crate::sparql::client::{SparqlClient, ACCEPT_JSON_LD, ACCEPT_SPARQL_RESULTS};
use crate::sparql::index::QueryIndex;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Owns the SPARQL client, the query index and the SPARQL cache manager
///
/// Created once per build and passed explicitly to whatever renders pages.
#[derive(Debug)]
pub struct Repository {
    client: SparqlClient,
    queries: QueryIndex,
    cache: CacheManager,
}

impl Repository {
    pub fn new(config: &ClientConfig, queries: QueryIndex, cache: CacheManager) -> Result<Self> {
        Ok(Self {
            client: SparqlClient::new(config)?,
            queries,
            cache,
        })
    }

    pub fn queries(&self) -> &QueryIndex {
        &self.queries
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    pub fn client(&self) -> &SparqlClient {
        &self.client
    }

    /// Look up a query and substitute its positional arguments
    ///
    /// Arguments without a matching `{{.}}` are ignored with a warning.
    pub fn resolve(&self, identifier: &str, args: &[QueryArg]) -> Result<String> {
        let template = self
            .queries
            .get(identifier)
            .ok_or_else(|| SparqlCacheError::QueryNotFound(identifier.to_string()))?;

        let (query, surplus) = substitute(template, args);
        if surplus > 0 {
            warn!(
                query = identifier,
                supplied = args.len(),
                unused = surplus,
                "More arguments than placeholders"
            );
        }

        Ok(query)
    }

    /// Run a SELECT-style query and decode its rows
    pub fn query_select(&mut self, identifier: &str, args: &[QueryArg]) -> Result<Vec<Row>> {
        let body = self.fetch(identifier, args, ACCEPT_SPARQL_RESULTS)?;
        decode_results(body.as_bytes())
    }

    /// Run a CONSTRUCT-style query and return the JSON-LD document
    pub fn query_construct(&mut self, identifier: &str, args: &[QueryArg]) -> Result<Value> {
        let body = self.fetch(identifier, args, ACCEPT_JSON_LD)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Flush the SPARQL cache ledger; call once at the end of a build
    pub fn teardown(&self) -> Result<()> {
        self.cache.teardown()
    }

    fn fetch(&mut self, identifier: &str, args: &[QueryArg], accept: &str) -> Result<String> {
        let query = self.resolve(identifier, args)?;
        let key = CacheKey::new(identifier, &query);

        if let Some(cached) = self.cache.get_cache_by_key(&key)? {
            info!(query = identifier, "Using cached response");
            return Ok(cached);
        }

        if args.is_empty() {
            info!(query = identifier, "Issuing query");
        } else {
            let rendered: Vec<String> = args.iter().map(ToString::to_string).collect();
            info!(query = identifier, args = ?rendered, "Issuing parameterized query");
        }

        let body = self.client.execute(&query, accept)?;
        self.cache.set_cache_by_key(&key, &body)?;
        debug!(query = identifier, bytes = body.len(), "Cached response");

        Ok(body)
    }
}
