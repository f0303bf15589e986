/**
 * config.rs
 * Parser for the site configuration file (YAML format)
 *
 * Format:
 * ```yaml
 * sparql_client:
 *   endpoint: https://query.wikidata.org/sparql
 *   http_headers:
 *     User-Agent: my-site-builder
 * metadata:
 *   title: My site
 * ```
 */

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::errors::{Result, SparqlCacheError};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "snowman.yaml";

/// SPARQL client settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Query endpoint URL
    pub endpoint: String,
    /// Static headers sent with every request
    #[serde(rename = "http_headers", default)]
    pub headers: HashMap<String, String>,
}

/// Site configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SiteConfig {
    #[serde(rename = "sparql_client")]
    pub client: ClientConfig,
    /// Free-form metadata, handed through to the rendering pipeline
    #[serde(default)]
    pub metadata: HashMap<String, serde_yaml::Value>,
}

impl SiteConfig {
    /// Load the configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the YAML file (usually `snowman.yaml`)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SparqlCacheError::FileNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration YAML
    pub fn parse(content: &str) -> Result<Self> {
        let config: SiteConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The endpoint must be an absolute http(s) URL
    pub fn validate(&self) -> Result<()> {
        let endpoint = Url::parse(&self.client.endpoint).map_err(|e| {
            SparqlCacheError::Config(format!(
                "Invalid SPARQL endpoint '{}': {}",
                self.client.endpoint, e
            ))
        })?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(SparqlCacheError::Config(format!(
                "Invalid SPARQL endpoint '{}': expected an http or https URL",
                self.client.endpoint
            )));
        }

        Ok(())
    }
}
