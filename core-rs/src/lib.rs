//! # sparql-cache - SPARQL client with an on-disk response cache
//!
//! Data layer for a static site builder: query documents are resolved with
//! positional arguments, sent to a SPARQL endpoint, and the raw responses are
//! cached on disk so later builds can run without the network.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │               BuildContext               │
//! │  ┌────────────────┐  ┌────────────────┐  │
//! │  │   Repository   │  │ RemoteResources│  │
//! │  │ index + client │  │   HTTP GET     │  │
//! │  └───────┬────────┘  └───────┬────────┘  │
//! │          ▼                   ▼           │
//! │   CacheManager(sparql) CacheManager(res) │
//! └──────────┬───────────────────┬───────────┘
//!            ▼                   ▼
//!   .snowman/cache/sparql  .snowman/cache/resources
//! ```
//!
//! Responses are decoded into RDF [`Term`]s; each build records the cache
//! keys it touched so stale entries can be found and removed later.

pub mod cache;
pub mod config;
pub mod context;
pub mod errors;
pub mod rdf;
pub mod remote;
pub mod sparql;

pub use cache::{CacheKey, CacheKind, CacheManager, CacheStrategy};
pub use config::{ClientConfig, SiteConfig};
pub use context::BuildContext;
pub use errors::{Result, SparqlCacheError};
pub use rdf::{decode_results, Blank, Iri, Literal, Row, Term, TermType};
pub use remote::RemoteResources;
pub use sparql::{QueryArg, QueryIndex, Repository, SparqlClient};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default directory for caches and ledgers
pub const DEFAULT_SNOWMAN_DIR: &str = ".snowman";
