//! SPARQL query layer
//!
//! - args: positional query arguments and `{{.}}` substitution
//! - index: query documents keyed by location
//! - client: HTTP transport to the configured endpoint
//! - repository: cache-aware query execution

pub mod args;
pub mod client;
pub mod index;
pub mod repository;

pub use args::{substitute, QueryArg, PLACEHOLDER};
pub use client::{SparqlClient, ACCEPT_JSON_LD, ACCEPT_SPARQL_RESULTS};
pub use index::{QueryIndex, DEFAULT_QUERIES_DIR};
pub use repository::Repository;
