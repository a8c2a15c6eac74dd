//! YAML documents: the config file and the thread log.
//!
//! The config document holds `permissions`, `roles` and `speakers`; the
//! thread document is a plain list of message records. They are kept apart
//! so the thread can grow one record at a time while the config stays put.

use crate::error::ModelError;
use crate::{Config, Message, Thread};
use roundtable_schema::{SchemaError, Value, from_mapping, to_mapping};
use std::collections::BTreeMap;

/// Parse YAML text into a [`Value`]. Blank text is [`Value::Null`].
pub fn parse_yaml(text: &str) -> Result<Value, ModelError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_yaml::from_str(text)?)
}

/// Emit a [`Value`] as YAML text.
pub fn dump_yaml(value: &Value) -> Result<String, ModelError> {
    Ok(serde_yaml::to_string(value)?)
}

/// Render one message as a single-element YAML list, so appending records
/// to a file keeps it a valid thread document.
pub fn message_record(message: &Message) -> Result<String, ModelError> {
    dump_yaml(&Value::Seq(vec![to_mapping(message)]))
}

/// Config and thread as two YAML texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    /// Entity definitions.
    pub config: String,
    /// Message records.
    pub thread: String,
}

impl ConfigDocument {
    /// Pair up the two texts.
    pub fn new(config: impl Into<String>, thread: impl Into<String>) -> Self {
        Self {
            config: config.into(),
            thread: thread.into(),
        }
    }

    /// Load a [`Config`] whose main thread holds the thread document's
    /// messages. Blank texts count as empty documents.
    pub fn into_config(self) -> Result<Config, ModelError> {
        let mut root = match parse_yaml(&self.config)? {
            Value::Null => BTreeMap::new(),
            Value::Map(map) => map,
            other => return Err(SchemaError::mismatch("mapping", &other).into()),
        };
        let messages = match parse_yaml(&self.thread)? {
            Value::Null => Value::Seq(Vec::new()),
            other => other,
        };
        root.insert(
            "main_thread".to_owned(),
            Value::map([("messages", messages)]),
        );
        Ok(from_mapping(&Value::Map(root))?)
    }

    /// Split a [`Config`] back into the two texts.
    pub fn from_config(config: &Config) -> Result<Self, ModelError> {
        let mut root = match to_mapping(config) {
            Value::Map(map) => map,
            other => return Err(SchemaError::mismatch("mapping", &other).into()),
        };
        let messages = root
            .remove("main_thread")
            .and_then(|t| t.get("messages").cloned())
            .unwrap_or_else(|| Value::Seq(Vec::new()));
        Ok(Self {
            config: dump_yaml(&Value::Map(root))?,
            thread: dump_yaml(&messages)?,
        })
    }
}

/// Parse a thread document on its own.
pub fn read_thread(text: &str) -> Result<Thread, ModelError> {
    let messages = match parse_yaml(text)? {
        Value::Null => Value::Seq(Vec::new()),
        other => other,
    };
    Ok(from_mapping(&Value::map([("messages", messages)]))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_documents_are_empty() {
        let c = ConfigDocument::new("", "  \n").into_config().unwrap();
        assert!(c.speakers().is_empty());
        assert!(c.main_thread().is_empty());
    }

    #[test]
    fn config_must_be_a_mapping() {
        let err = ConfigDocument::new("- a\n- b\n", "").into_config().unwrap_err();
        assert!(matches!(err, ModelError::Schema(_)));
    }

    #[test]
    fn bad_yaml_is_reported() {
        let err = ConfigDocument::new("speakers: [", "").into_config().unwrap_err();
        assert!(matches!(err, ModelError::Yaml(_)));
    }

    #[test]
    fn records_append_into_a_list() {
        let a = Message::new(10, 1, "alice", ["rt_public"], "hi").unwrap();
        let b = Message::new(11, 2, "bob", ["rt_public"], "two\nlines").unwrap();
        let text = message_record(&a).unwrap() + &message_record(&b).unwrap();
        let thread = read_thread(&text).unwrap();
        assert_eq!(thread.messages(), &[a, b]);
    }

    #[test]
    fn thread_errors_carry_a_trail() {
        let err = read_thread("- id: 1\n  timestamp: 0\n  speaker: a\n  permissions: [p]\n")
            .unwrap_err();
        let ModelError::Schema(err) = err else {
            panic!("expected a schema error");
        };
        assert_eq!(err.path(), "messages[0].content");
    }
}
