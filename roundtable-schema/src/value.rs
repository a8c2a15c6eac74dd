//! The any-value container that wire data is read into and written out of.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A dynamically shaped wire value.
///
/// Any serde format can be read into a `Value` (YAML documents, JSON
/// payloads) and the schema tables then coerce it into typed entities.
/// Mapping keys are kept sorted so emitted documents are stable. Integers
/// beyond the `i64` range read as floats.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent or explicit null.
    #[default]
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Floating point scalar.
    Float(f64),
    /// String scalar.
    Str(String),
    /// Ordered sequence (lists, sets and tuples all travel as sequences).
    Seq(Vec<Value>),
    /// String-keyed mapping.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Short name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Seq(_) => "sequence",
            Value::Map(_) => "mapping",
        }
    }

    /// Whether this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the mapping, if this is one.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Borrow the sequence, if this is one.
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Look up a key when this is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Length of strings (in chars), sequences and mappings.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::Seq(s) => Some(s.len()),
            Value::Map(m) => Some(m.len()),
            _ => None,
        }
    }

    /// Build a mapping from `(key, value)` pairs.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::from(3).kind(), "int");
        assert_eq!(Value::from("x").kind(), "string");
        assert_eq!(Value::Seq(vec![]).kind(), "sequence");
        assert_eq!(Value::map::<&str>([]).kind(), "mapping");
    }

    #[test]
    fn len_counts_chars_items_and_entries() {
        assert_eq!(Value::from("héllo").len(), Some(5));
        assert_eq!(Value::Seq(vec![Value::Null, Value::Null]).len(), Some(2));
        assert_eq!(Value::map([("a", Value::Null)]).len(), Some(1));
        assert_eq!(Value::from(1).len(), None);
    }

    #[test]
    fn reads_yaml_document() {
        let v: Value = serde_yaml::from_str("id: 2\nname: s1\ntags:\n- a\n- b\nnothing: ~\n").unwrap();
        assert_eq!(v.get("id"), Some(&Value::Int(2)));
        assert_eq!(v.get("name"), Some(&Value::from("s1")));
        assert_eq!(
            v.get("tags"),
            Some(&Value::Seq(vec![Value::from("a"), Value::from("b")]))
        );
        assert_eq!(v.get("nothing"), Some(&Value::Null));
    }

    #[test]
    fn reads_json_document() {
        let v: Value = serde_json::from_str(r#"{"ok": true, "ratio": 0.5}"#).unwrap();
        assert_eq!(v.get("ok"), Some(&Value::Bool(true)));
        assert_eq!(v.get("ratio"), Some(&Value::Float(0.5)));
    }

    #[test]
    fn yaml_round_trip_keeps_shape() {
        let v = Value::map([
            ("empty", Value::Null),
            ("flag", Value::Bool(false)),
            ("ratio", Value::Float(1.5)),
            ("list", Value::Seq(vec![Value::from(1), Value::from("two")])),
            ("nested", Value::map([("id", Value::from(3))])),
        ]);
        let text = serde_yaml::to_string(&v).unwrap();
        assert_eq!(serde_yaml::from_str::<Value>(&text).unwrap(), v);
    }

    #[test]
    fn non_string_keys_are_rejected() {
        assert!(serde_json::from_str::<Value>("[1, {\"a\": [true, null]}]").is_ok());
        assert!(serde_yaml::from_str::<Value>("{[1, 2]: x}").is_err());
    }

    #[test]
    fn writes_sorted_mapping() {
        let v = Value::map([("zeta", Value::from(1)), ("alpha", Value::from(2))]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"alpha":2,"zeta":1}"#);
    }

    #[test]
    fn display_is_compact() {
        let v = Value::map([("a", Value::Seq(vec![Value::from(1), Value::from("x")]))]);
        assert_eq!(v.to_string(), r#"{a: [1, "x"]}"#);
    }
}
