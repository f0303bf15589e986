//! Well-known vocabulary IRIs used by the term model

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// Implicit datatype of language-tagged literals
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// Datatype of plain literals without language or explicit datatype
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
