//! Decoder for the SPARQL 1.1 Query Results JSON format
//!
//! Only a malformed document (bad JSON, or no `results.bindings` array) is an
//! error. Problems inside a single binding never fail the decode: invalid
//! IRIs and blank node ids and unknown value types drop that variable from
//! its row, and an invalid datatype IRI degrades the literal to `xsd:string`.

use crate::errors::Result;
use crate::rdf::term::{Blank, Iri, Literal, Term};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// One solution: variable name -> term
pub type Row = HashMap<String, Term>;

#[derive(Debug, Deserialize)]
struct ResultsDocument {
    results: ResultsBody,
}

#[derive(Debug, Deserialize)]
struct ResultsBody {
    bindings: Vec<HashMap<String, RawValue>>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    value: String,
    #[serde(rename = "xml:lang", default)]
    lang: Option<String>,
    #[serde(default)]
    datatype: Option<String>,
}

/// Decode a SPARQL JSON results document into rows of terms
///
/// # Example
///
/// ```
/// use sparql_cache::rdf::decode_results;
///
/// let body = br#"{"results":{"bindings":[{"name":{"type":"literal","value":"Canada","xml:lang":"en"}}]}}"#;
/// let rows = decode_results(body).unwrap();
/// assert_eq!(rows[0]["name"].to_string(), "Canada");
/// ```
pub fn decode_results(bytes: &[u8]) -> Result<Vec<Row>> {
    let document: ResultsDocument = serde_json::from_slice(bytes)?;

    Ok(document
        .results
        .bindings
        .into_iter()
        .map(decode_binding)
        .collect())
}

fn decode_binding(binding: HashMap<String, RawValue>) -> Row {
    let mut row = Row::with_capacity(binding.len());
    for (variable, raw) in binding {
        if let Some(term) = decode_value(&variable, &raw) {
            row.insert(variable, term);
        }
    }
    row
}

fn decode_value(variable: &str, raw: &RawValue) -> Option<Term> {
    match raw.kind.as_str() {
        "uri" => match Iri::new(&raw.value) {
            Ok(iri) => Some(iri.into()),
            Err(e) => {
                debug!(variable, error = %e, "Dropping invalid IRI binding");
                None
            }
        },
        "bnode" => match Blank::new(&raw.value) {
            Ok(blank) => Some(blank.into()),
            Err(e) => {
                debug!(variable, error = %e, "Dropping invalid blank node binding");
                None
            }
        },
        "literal" => Some(decode_literal(variable, raw).into()),
        "typed-literal" => {
            Some(typed_literal(variable, &raw.value, raw.datatype.as_deref()).into())
        }
        other => {
            debug!(variable, kind = other, "Dropping binding with unknown type");
            None
        }
    }
}

fn decode_literal(variable: &str, raw: &RawValue) -> Literal {
    if let Some(lang) = raw.lang.as_deref().filter(|l| !l.is_empty()) {
        match Literal::new_lang(&raw.value, lang) {
            Ok(literal) => return literal,
            Err(e) => {
                debug!(variable, error = %e, "Ignoring invalid language tag");
            }
        }
    }

    typed_literal(variable, &raw.value, raw.datatype.as_deref())
}

fn typed_literal(variable: &str, value: &str, datatype: Option<&str>) -> Literal {
    match datatype.filter(|dt| !dt.is_empty()) {
        None => Literal::new_string(value),
        Some(dt) => match Iri::new(dt) {
            Ok(iri) => Literal::new_typed(value, iri),
            Err(e) => {
                warn!(variable, error = %e, "Invalid datatype IRI, decoding literal as xsd:string");
                Literal::new_string(value)
            }
        },
    }
}
