use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use super::serde_utils::serialize_paths_as_tree;
use super::{Value, MESSAGE_FIELD};

/// Typed access to a hierarchical, dot-separated field namespace.
///
/// The adapter enforces no schema: any path may hold any [`Value`].
pub trait EventStore {
    /// Current value at `path`, if set.
    fn get(&self, path: &str) -> Option<&Value>;

    /// Set `path`, replacing any previous value.
    fn put(&mut self, path: &str, value: Value);

    /// Remove `path`, returning the previous value.
    fn delete(&mut self, path: &str) -> Option<Value>;

    /// Every field whose path starts with `prefix`, keyed by the remainder of
    /// the path, in ascending key order.
    fn fields_with_prefix(&self, prefix: &str) -> Vec<(String, Value)>;

    /// Remove every field under `prefix`.
    fn delete_prefix(&mut self, prefix: &str) {
        for (key, _) in self.fields_with_prefix(prefix) {
            self.delete(&format!("{}{}", prefix, key));
        }
    }
}

/// In-memory event backed by an ordered map of full dotted paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    fields: BTreeMap<String, Value>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an event holding a raw log line in `message`.
    pub fn from_message(line: impl Into<String>) -> Self {
        let mut event = Self::new();
        event.put(MESSAGE_FIELD, Value::Str(line.into()));
        event
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate `(path, value)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Convenience accessor returning the string form of a field.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.fields.get(path).and_then(Value::as_str)
    }
}

impl EventStore for Event {
    fn get(&self, path: &str) -> Option<&Value> {
        self.fields.get(path)
    }

    fn put(&mut self, path: &str, value: Value) {
        self.fields.insert(path.to_string(), value);
    }

    fn delete(&mut self, path: &str) -> Option<Value> {
        self.fields.remove(path)
    }

    fn fields_with_prefix(&self, prefix: &str) -> Vec<(String, Value)> {
        self.fields
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k[prefix.len()..].to_string(), v.clone()))
            .collect()
    }
}

impl Serialize for Event {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_paths_as_tree(&self.fields, serializer)
    }
}
