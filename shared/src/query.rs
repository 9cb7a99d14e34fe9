//! Row query predicates
//!
//! The row store accepts a list of predicates per list-rows call, each encoded
//! as a JSON string:
//! ```json
//! {"method":"equal","attribute":"club","values":["Omega Chi"]}
//! {"method":"orderAsc","attribute":"date"}
//! {"method":"limit","values":[1]}
//! {"method":"offset","values":[100]}
//! ```

use serde_json::{Value, json};

/// Single row query predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Column equals any of the values
    Equal(String, Vec<Value>),
    OrderAsc(String),
    OrderDesc(String),
    Limit(u32),
    /// Rows to skip before the page starts
    Offset(u32),
}

impl Query {
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Equal(attribute.into(), vec![value.into()])
    }

    pub fn order_asc(attribute: impl Into<String>) -> Self {
        Query::OrderAsc(attribute.into())
    }

    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Query::OrderDesc(attribute.into())
    }

    pub fn limit(n: u32) -> Self {
        Query::Limit(n)
    }

    pub fn offset(n: u32) -> Self {
        Query::Offset(n)
    }

    /// Method name as understood by the backend
    pub fn method(&self) -> &'static str {
        match self {
            Query::Equal(..) => "equal",
            Query::OrderAsc(_) => "orderAsc",
            Query::OrderDesc(_) => "orderDesc",
            Query::Limit(_) => "limit",
            Query::Offset(_) => "offset",
        }
    }

    pub fn attribute(&self) -> Option<&str> {
        match self {
            Query::Equal(attr, _) | Query::OrderAsc(attr) | Query::OrderDesc(attr) => {
                Some(attr.as_str())
            }
            Query::Limit(_) | Query::Offset(_) => None,
        }
    }

    /// JSON encoding sent as one `queries[]` parameter
    pub fn to_wire(&self) -> String {
        let value = match self {
            Query::Equal(attr, values) => {
                json!({ "method": self.method(), "attribute": attr, "values": values })
            }
            Query::OrderAsc(attr) | Query::OrderDesc(attr) => {
                json!({ "method": self.method(), "attribute": attr })
            }
            Query::Limit(n) | Query::Offset(n) => {
                json!({ "method": self.method(), "values": [n] })
            }
        };
        value.to_string()
    }
}
