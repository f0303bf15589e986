//! RDF term model
//!
//! - term: blank nodes, IRIs and literals with construction-time validation
//! - results: SPARQL JSON results decoder producing rows of terms
//! - vocab: well-known datatype IRIs

pub mod results;
pub mod term;
pub mod vocab;

pub use results::{decode_results, Row};
pub use term::{is_valid_language_tag, Blank, Iri, Literal, Term, TermType};
