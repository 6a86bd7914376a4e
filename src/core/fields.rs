//! Structured field values attached to entries
//!
//! `FieldValue` is a closed set of serializable shapes plus one marker
//! variant, `Function`, for callables. Callables can be described but never
//! stored on an entry: field attachment rejects them and records a note.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Key/value mapping carried by an entry
pub type Fields = HashMap<String, FieldValue>;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
    /// A function or closure, tagged by its type name
    Function(&'static str),
}

impl FieldValue {
    /// Describe a function or closure.
    ///
    /// The result is never stored by `Entry::with_field`; it exists so that
    /// callers who try get a diagnostic instead of a silently dropped value.
    pub fn function<F>(_f: &F) -> Self {
        FieldValue::Function(std::any::type_name::<F>())
    }

    /// Convert any serializable value; objects become `Map`
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => FieldValue::from(json),
            Err(e) => FieldValue::String(format!("<unserializable: {}>", e)),
        }
    }

    /// Capability check used when attaching fields
    #[inline]
    pub fn is_callable(&self) -> bool {
        matches!(self, FieldValue::Function(_))
    }

    /// Whether this is a structured record rather than a primitive
    #[inline]
    pub fn is_record(&self) -> bool {
        matches!(self, FieldValue::Map(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::UInt(u) => serde_json::Value::Number((*u).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::List(items) => {
                serde_json::Value::Array(items.iter().map(FieldValue::to_json_value).collect())
            }
            FieldValue::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect(),
            ),
            FieldValue::Function(name) => serde_json::Value::String(format!("<func {}>", name)),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::UInt(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
            FieldValue::List(_) | FieldValue::Map(_) => write!(f, "{}", self.to_json_value()),
            FieldValue::Function(name) => write!(f, "<func {}>", name),
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    FieldValue::UInt(u)
                } else {
                    FieldValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(map) => FieldValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::UInt(u)
    }
}

impl From<u32> for FieldValue {
    fn from(u: u32) -> Self {
        FieldValue::UInt(u64::from(u))
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::UInt(u as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<f32> for FieldValue {
    fn from(f: f32) -> Self {
        FieldValue::Float(f64::from(f))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_conversions() {
        assert_eq!(FieldValue::from("a"), FieldValue::String("a".into()));
        assert_eq!(FieldValue::from(7i32), FieldValue::Int(7));
        assert_eq!(FieldValue::from(7u32), FieldValue::UInt(7));
        assert_eq!(FieldValue::from(true), FieldValue::Bool(true));
        assert_eq!(FieldValue::from(None::<i64>), FieldValue::Null);
    }

    #[test]
    fn test_function_is_callable() {
        let callback = |x: i32| x + 1;
        let value = FieldValue::function(&callback);
        assert!(value.is_callable());
        assert!(!FieldValue::from("handler").is_callable());
    }

    #[test]
    fn test_from_serialize_record() {
        #[derive(Serialize)]
        struct Request {
            id: u32,
            path: &'static str,
        }

        let value = FieldValue::from_serialize(&Request { id: 9, path: "/health" });
        assert!(value.is_record());
        match value {
            FieldValue::Map(map) => {
                assert_eq!(map.get("id"), Some(&FieldValue::Int(9)));
                assert_eq!(map.get("path"), Some(&FieldValue::String("/health".into())));
            }
            other => panic!("expected record, got {:?}", other),
        }

        assert!(!FieldValue::from_serialize(&42).is_record());
    }

    #[test]
    fn test_json_conversion() {
        let value = FieldValue::from(vec![1i64, 2, 3]);
        assert_eq!(value.to_json_value(), serde_json::json!([1, 2, 3]));
        assert_eq!(FieldValue::Float(f64::NAN).to_json_value(), serde_json::Value::Null);
    }
}
