//! Content-addressed response cache
//!
//! Two independent instances run side by side during a build: one for
//! SPARQL responses and one for remote resources. They share hashing and
//! directory-walking code but never a ledger or an index.

pub mod key;
pub mod kind;
pub mod ledger;
pub mod manager;

pub use key::{hash, CacheKey};
pub use kind::{CacheKind, CacheStrategy};
pub use ledger::Ledger;
pub use manager::CacheManager;
