//! Cached fetcher for remote resources
//!
//! Resources are keyed by host and full URL, so every resource from one host
//! lands in the same cache directory.

use crate::cache::{CacheKey, CacheManager};
use crate::errors::{Result, SparqlCacheError};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::{debug, info};

#[derive(Debug)]
pub struct RemoteResources {
    cache: CacheManager,
    http: Client,
}

impl RemoteResources {
    pub fn new(cache: CacheManager) -> Result<Self> {
        Ok(Self {
            cache,
            http: Client::builder().build()?,
        })
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// Fetch `url` with a plain GET, serving from the cache when possible
    ///
    /// Anything other than `200 OK` is an [`SparqlCacheError::Endpoint`]
    /// and is not cached.
    pub fn get_remote(&mut self, url: &str) -> Result<String> {
        let key = CacheKey::for_url(url)?;

        if let Some(cached) = self.cache.get_cache_by_key(&key)? {
            info!(url, "Using cached resource");
            return Ok(cached);
        }

        info!(url, "Fetching remote resource");
        let response = self.http.get(url).send()?;
        let status = response.status();
        let body = response.text()?;

        if status != StatusCode::OK {
            return Err(SparqlCacheError::Endpoint {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        self.cache.set_cache_by_key(&key, &body)?;
        debug!(url, bytes = body.len(), "Cached resource");

        Ok(body)
    }

    /// Flush the resources ledger
    pub fn teardown(&self) -> Result<()> {
        self.cache.teardown()
    }
}
