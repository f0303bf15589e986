//! RDF terms: blank nodes, IRIs and literals
//!
//! Every term is validated when it is constructed. A value that exists is
//! always well-formed, so downstream code never re-checks identifiers,
//! IRIs or language tags.

use crate::errors::{Result, SparqlCacheError};
use crate::rdf::vocab::{RDF_LANG_STRING, XSD_STRING};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{Serialize, Serializer};
use std::fmt;

static LANGUAGE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+(-[A-Za-z0-9]+)*$").expect("language tag pattern"));

const BLANK_PREFIX: &str = "_:";

/// Discriminant of a [`Term`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermType {
    Blank,
    Iri,
    Literal,
}

/// Blank node, identified only within one result set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Blank {
    /// Stored with the `_:` prefix
    id: String,
}

impl Blank {
    /// Create a blank node from its local identifier
    ///
    /// # Example
    ///
    /// ```
    /// use sparql_cache::rdf::Blank;
    ///
    /// let node = Blank::new("b0").unwrap();
    /// assert_eq!(node.id(), "b0");
    /// assert!(Blank::new("   ").is_err());
    /// ```
    pub fn new(id: &str) -> Result<Self> {
        if id.trim().is_empty() {
            return Err(SparqlCacheError::InvalidIdentifier(id.to_string()));
        }
        Ok(Self {
            id: format!("{}{}", BLANK_PREFIX, id),
        })
    }

    /// Identifier without the `_:` prefix
    pub fn id(&self) -> &str {
        &self.id[BLANK_PREFIX.len()..]
    }
}

impl fmt::Display for Blank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Validated IRI
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(String);

impl Iri {
    /// Create an IRI, rejecting control characters and reserved delimiters
    ///
    /// # Example
    ///
    /// ```
    /// use sparql_cache::rdf::Iri;
    ///
    /// let iri = Iri::new("http://example.org/resource").unwrap();
    /// assert_eq!(iri.as_str(), "http://example.org/resource");
    /// assert!(Iri::new("http://example.org/<resource>").is_err());
    /// ```
    pub fn new(value: &str) -> Result<Self> {
        if value.is_empty() {
            return Err(SparqlCacheError::InvalidIri("empty IRI".to_string()));
        }

        for c in value.chars() {
            let disallowed = c <= '\u{20}'
                || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\');
            if disallowed {
                return Err(SparqlCacheError::InvalidIri(format!(
                    "disallowed character {:?} in {:?}",
                    c, value
                )));
            }
        }

        Ok(Self(value.to_string()))
    }

    /// Well-known IRIs from the vocabulary constants
    pub(crate) fn from_vocab(value: &'static str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into (namespace, local name)
    ///
    /// The last `#` wins. Without one, the last `/` after a `://` scheme
    /// separator is used, or the last `/` anywhere when there is no scheme.
    /// Returns two empty strings when no split point exists.
    ///
    /// # Example
    ///
    /// ```
    /// use sparql_cache::rdf::Iri;
    ///
    /// let iri = Iri::new("http://example.org/resource").unwrap();
    /// assert_eq!(iri.split(), ("http://example.org/", "resource"));
    ///
    /// let bare = Iri::new("http://example.org").unwrap();
    /// assert_eq!(bare.split(), ("", ""));
    /// ```
    pub fn split(&self) -> (&str, &str) {
        let s = self.0.as_str();

        if let Some(i) = s.rfind('#') {
            return (&s[..=i], &s[i + 1..]);
        }

        match s.find("://") {
            Some(scheme) => {
                let start = scheme + 3;
                if let Some(rel) = s[start..].rfind('/') {
                    let i = start + rel;
                    return (&s[..=i], &s[i + 1..]);
                }
            }
            None => {
                if let Some(i) = s.rfind('/') {
                    return (&s[..=i], &s[i + 1..]);
                }
            }
        }

        ("", "")
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Literal with either a language tag (and `rdf:langString`) or a datatype
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    value: String,
    lang: Option<String>,
    datatype: Iri,
}

impl Literal {
    /// Language-tagged literal
    ///
    /// # Example
    ///
    /// ```
    /// use sparql_cache::rdf::Literal;
    ///
    /// let lit = Literal::new_lang("Canada", "en").unwrap();
    /// assert_eq!(lit.lang(), Some("en"));
    /// assert!(Literal::new_lang("Canada", "en--US").is_err());
    /// ```
    pub fn new_lang(value: &str, lang: &str) -> Result<Self> {
        if !is_valid_language_tag(lang) {
            return Err(SparqlCacheError::InvalidLanguageTag(lang.to_string()));
        }
        Ok(Self {
            value: value.to_string(),
            lang: Some(lang.to_string()),
            datatype: Iri::from_vocab(RDF_LANG_STRING),
        })
    }

    /// Literal with an explicit datatype
    pub fn new_typed(value: &str, datatype: Iri) -> Self {
        Self {
            value: value.to_string(),
            lang: None,
            datatype,
        }
    }

    /// Plain `xsd:string` literal
    pub fn new_string(value: &str) -> Self {
        Self::new_typed(value, Iri::from_vocab(XSD_STRING))
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn datatype(&self) -> &Iri {
        &self.datatype
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Check a language tag against `[A-Za-z]+(-[A-Za-z0-9]+)*`
pub fn is_valid_language_tag(tag: &str) -> bool {
    LANGUAGE_TAG.is_match(tag)
}

/// Any RDF term
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Blank(Blank),
    Iri(Iri),
    Literal(Literal),
}

impl Term {
    pub fn term_type(&self) -> TermType {
        match self {
            Term::Blank(_) => TermType::Blank,
            Term::Iri(_) => TermType::Iri,
            Term::Literal(_) => TermType::Literal,
        }
    }

    pub fn as_blank(&self) -> Option<&Blank> {
        match self {
            Term::Blank(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(l) => Some(l),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Blank(b) => b.fmt(f),
            Term::Iri(i) => i.fmt(f),
            Term::Literal(l) => l.fmt(f),
        }
    }
}

impl From<Blank> for Term {
    fn from(b: Blank) -> Self {
        Term::Blank(b)
    }
}

impl From<Iri> for Term {
    fn from(i: Iri) -> Self {
        Term::Iri(i)
    }
}

impl From<Literal> for Term {
    fn from(l: Literal) -> Self {
        Term::Literal(l)
    }
}

/// SPARQL JSON binding shape, borrowed from a term
#[derive(serde::Serialize)]
struct BindingShape<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
    #[serde(rename = "xml:lang", skip_serializing_if = "Option::is_none")]
    lang: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    datatype: Option<&'a str>,
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let shape = match self {
            Term::Blank(b) => BindingShape {
                kind: "bnode",
                value: b.id(),
                lang: None,
                datatype: None,
            },
            Term::Iri(i) => BindingShape {
                kind: "uri",
                value: i.as_str(),
                lang: None,
                datatype: None,
            },
            Term::Literal(l) => BindingShape {
                kind: "literal",
                value: l.value(),
                lang: l.lang(),
                datatype: match l.lang() {
                    Some(_) => None,
                    None => Some(l.datatype().as_str()),
                },
            },
        };
        shape.serialize(serializer)
    }
}
