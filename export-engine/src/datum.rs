//! FILENAME: export-engine/src/datum.rs
//! PURPOSE: The dynamic value model that accessors read from and export walks over.
//! CONTEXT: Instances are plain data trees (scalars, records, lists). The engine
//! never introspects caller types; callers bridge their own types into Datum and
//! describe the shape through an AccessorSource.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically typed instance value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Datum {
    Null,
    Text(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    /// A named-field record; the shape accessors usually read from.
    Record(FxHashMap<String, Datum>),
    /// An ordered sequence; what collection accessors must produce.
    List(Vec<Datum>),
}

impl Datum {
    pub fn text(s: impl Into<String>) -> Self {
        Datum::Text(s.into())
    }

    /// Builds a record from (name, value) pairs.
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Datum)>,
    {
        Datum::Record(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    pub fn list(items: impl IntoIterator<Item = Datum>) -> Self {
        Datum::List(items.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    /// Looks up a record field; None for non-records or absent fields.
    pub fn field(&self, name: &str) -> Option<&Datum> {
        match self {
            Datum::Record(fields) => fields.get(name),
            _ => None,
        }
    }

    /// A short name of the variant, used in shape-mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Datum::Null => "null",
            Datum::Text(_) => "text",
            Datum::Integer(_) => "integer",
            Datum::Number(_) => "number",
            Datum::Boolean(_) => "boolean",
            Datum::Record(_) => "record",
            Datum::List(_) => "list",
        }
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Datum::Text(value.to_string())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Datum::Text(value)
    }
}

impl From<i64> for Datum {
    fn from(value: i64) -> Self {
        Datum::Integer(value)
    }
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Datum::Number(value)
    }
}

impl From<bool> for Datum {
    fn from(value: bool) -> Self {
        Datum::Boolean(value)
    }
}

impl fmt::Display for Datum {
    /// The default string form used when a value lands in a cell.
    /// Record fields are emitted in sorted key order so the rendering is
    /// reproducible regardless of map iteration order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => Ok(()),
            Datum::Text(s) => write!(f, "{}", s),
            Datum::Integer(i) => write!(f, "{}", i),
            Datum::Number(n) => write!(f, "{}", n),
            Datum::Boolean(b) => write!(f, "{}", b),
            Datum::Record(fields) => {
                let mut keys: Vec<&String> = fields.keys().collect();
                keys.sort();
                write!(f, "{{")?;
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, fields[*key])?;
                }
                write!(f, "}}")
            }
            Datum::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_display() {
        assert_eq!(Datum::from("Ana").to_string(), "Ana");
        assert_eq!(Datum::from(30i64).to_string(), "30");
        assert_eq!(Datum::from(30.0f64).to_string(), "30");
        assert_eq!(Datum::from(1.5f64).to_string(), "1.5");
        assert_eq!(Datum::from(true).to_string(), "true");
        assert_eq!(Datum::Null.to_string(), "");
    }

    #[test]
    fn test_record_display_is_sorted() {
        let record = Datum::record([
            ("zip", Datum::from("12345")),
            ("city", Datum::from("Lund")),
        ]);
        assert_eq!(record.to_string(), "{city: Lund, zip: 12345}");
    }

    #[test]
    fn test_list_display() {
        let list = Datum::list([Datum::from(1i64), Datum::from(2i64)]);
        assert_eq!(list.to_string(), "[1, 2]");
    }

    #[test]
    fn test_field_lookup() {
        let record = Datum::record([("name", Datum::from("Ana"))]);
        assert_eq!(record.field("name"), Some(&Datum::from("Ana")));
        assert_eq!(record.field("missing"), None);
        assert_eq!(Datum::Null.field("name"), None);
    }
}
