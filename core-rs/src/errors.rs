//! Error types for sparql-cache

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SparqlCacheError {
    #[error("Invalid blank node identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    #[error("Invalid language tag: {0:?}")]
    InvalidLanguageTag(String),

    #[error("The given query could not be found: {0}")]
    QueryNotFound(String),

    #[error("Invalid query argument: {0}")]
    InvalidArgument(String),

    #[error("Received bad response (HTTP {status}) from {url}: {body}")]
    Endpoint {
        url: String,
        status: u16,
        body: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, SparqlCacheError>;
