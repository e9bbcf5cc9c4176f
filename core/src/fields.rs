//! The field store: one object's mutable key/value state.

use std::collections::HashMap;

use serde_json::{Map, Value as Json};

use crate::value::Value;

/// Reserved key for the backend-assigned object id. Present once the object
/// has been saved; its presence is what "persisted" means.
pub const KEY_OBJECT_ID: &str = "objectId";

/// Reserved key for the backend-assigned creation timestamp.
pub const KEY_CREATED_AT: &str = "createdAt";

/// Mutable mapping from field name to [`Value`]. Last write wins; reads of
/// missing keys return `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: HashMap<String, Value>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `name`, replacing any previous value.
    pub fn put(&mut self, name: &str, value: impl Into<Value>) {
        self.entries.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Serialize every field to a flat JSON object, pointers included via
    /// their wire encoding.
    pub fn to_wire(&self) -> Json {
        let mut object = Map::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            object.insert(name.clone(), value.to_wire());
        }
        Json::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::Pointer;
    use serde_json::json;

    #[test]
    fn put_then_get_returns_the_value() {
        let mut fields = FieldMap::new();
        fields.put("score", 1337);
        assert_eq!(fields.get("score").unwrap().as_i64(), Some(1337));
        assert!(fields.contains("score"));
    }

    #[test]
    fn get_of_missing_key_is_none() {
        let fields = FieldMap::new();
        assert!(fields.get("anything").is_none());
        assert!(!fields.contains("anything"));
    }

    #[test]
    fn put_overwrites_previous_value() {
        let mut fields = FieldMap::new();
        fields.put("name", "first");
        fields.put("name", "second");
        assert_eq!(fields.get("name").unwrap().as_str(), Some("second"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn to_wire_is_a_flat_object_with_encoded_pointers() {
        let mut fields = FieldMap::new();
        fields.put("name", "Sean");
        fields.put("score", 42);
        fields.put("owner", Pointer::new("Player", "abc123"));
        assert_eq!(
            fields.to_wire(),
            json!({
                "name": "Sean",
                "score": 42,
                "owner": {"__type": "Pointer", "className": "Player", "objectId": "abc123"},
            })
        );
    }

    #[test]
    fn empty_map_serializes_to_empty_object() {
        assert_eq!(FieldMap::new().to_wire(), json!({}));
    }
}
