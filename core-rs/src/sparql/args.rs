//! Positional query arguments
//!
//! Arguments reach the repository from templates and the CLI. They are
//! checked once, when converted into a [`QueryArg`], and only rendered to
//! text when substituted into a query.

use crate::errors::{Result, SparqlCacheError};
use crate::rdf::Term;
use serde_json::Value;
use std::fmt;

/// Placeholder replaced by positional arguments, left to right
pub const PLACEHOLDER: &str = "{{.}}";

#[derive(Debug, Clone, PartialEq)]
pub enum QueryArg {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl fmt::Display for QueryArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryArg::Text(s) => f.write_str(s),
            QueryArg::Integer(i) => write!(f, "{}", i),
            QueryArg::Float(x) => write!(f, "{}", x),
            QueryArg::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for QueryArg {
    fn from(s: &str) -> Self {
        QueryArg::Text(s.to_string())
    }
}

impl From<String> for QueryArg {
    fn from(s: String) -> Self {
        QueryArg::Text(s)
    }
}

impl From<i64> for QueryArg {
    fn from(i: i64) -> Self {
        QueryArg::Integer(i)
    }
}

impl From<i32> for QueryArg {
    fn from(i: i32) -> Self {
        QueryArg::Integer(i64::from(i))
    }
}

impl From<f64> for QueryArg {
    fn from(x: f64) -> Self {
        QueryArg::Float(x)
    }
}

impl From<bool> for QueryArg {
    fn from(b: bool) -> Self {
        QueryArg::Boolean(b)
    }
}

/// Terms from earlier result rows are passed on by their lexical form
impl From<&Term> for QueryArg {
    fn from(term: &Term) -> Self {
        QueryArg::Text(term.to_string())
    }
}

impl TryFrom<&Value> for QueryArg {
    type Error = SparqlCacheError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(QueryArg::Text(s.clone())),
            Value::Bool(b) => Ok(QueryArg::Boolean(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(QueryArg::Integer(i)),
                None => n.as_f64().map(QueryArg::Float).ok_or_else(|| {
                    SparqlCacheError::InvalidArgument(format!("unrepresentable number {}", n))
                }),
            },
            other => Err(SparqlCacheError::InvalidArgument(format!(
                "expected a string, number or boolean, got {}",
                other
            ))),
        }
    }
}

/// Replace `{{.}}` placeholders with `args`, first occurrence first
///
/// Returns the substituted text and the number of arguments that found no
/// placeholder. Placeholders without an argument are left in place.
///
/// # Example
///
/// ```
/// use sparql_cache::sparql::{substitute, QueryArg};
///
/// let (query, surplus) = substitute("SELECT * { {{.}} ?p {{.}} }", &[QueryArg::from("<a>")]);
/// assert_eq!(query, "SELECT * { <a> ?p {{.}} }");
/// assert_eq!(surplus, 0);
/// ```
pub fn substitute(template: &str, args: &[QueryArg]) -> (String, usize) {
    let mut text = template.to_string();
    let mut surplus = 0;

    for arg in args {
        match text.find(PLACEHOLDER) {
            Some(pos) => text.replace_range(pos..pos + PLACEHOLDER.len(), &arg.to_string()),
            None => surplus += 1,
        }
    }

    (text, surplus)
}
