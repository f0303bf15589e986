//! HTTP client for a SPARQL endpoint
//!
//! Queries go out as `POST` with a form-encoded `query` field. The response
//! body is returned verbatim so it can be cached byte for byte.

use crate::config::ClientConfig;
use crate::errors::{Result, SparqlCacheError};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use std::collections::HashMap;
use tracing::info;

/// Accept header for SELECT-style queries
pub const ACCEPT_SPARQL_RESULTS: &str = "application/sparql-results+json";

/// Accept header for CONSTRUCT-style queries
pub const ACCEPT_JSON_LD: &str = "application/ld+json";

#[derive(Debug, Clone)]
pub struct SparqlClient {
    endpoint: String,
    headers: HeaderMap,
    http: Client,
}

impl SparqlClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            endpoint: config.endpoint.clone(),
            headers: build_headers(&config.headers)?,
            http: Client::builder().build()?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a query and return the raw response body
    ///
    /// Configured headers are sent first; `accept` overrides any configured
    /// `Accept`. A non-success status is an [`SparqlCacheError::Endpoint`].
    pub fn execute(&self, query: &str, accept: &str) -> Result<String> {
        let mut headers = self.headers.clone();
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(accept)
                .map_err(|e| SparqlCacheError::Config(format!("Invalid Accept header: {}", e)))?,
        );

        info!(endpoint = %self.endpoint, accept, "Issuing SPARQL query");

        let response = self
            .http
            .post(&self.endpoint)
            .headers(headers)
            .form(&[("query", query)])
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(SparqlCacheError::Endpoint {
                url: self.endpoint.clone(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

/// Convert configured header pairs, rejecting invalid names or values
pub(crate) fn build_headers(pairs: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(pairs.len());

    for (name, value) in pairs {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            SparqlCacheError::Config(format!("Invalid HTTP header name '{}': {}", name, e))
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            SparqlCacheError::Config(format!("Invalid value for HTTP header '{}': {}", name, e))
        })?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}
