//! The tagged value type stored in an object's fields.
//!
//! # Design
//! Fields are dynamically typed on the wire, so the store holds a closed
//! tagged union instead of downcasting opaque values: accessors pattern-match
//! and return `None` on a type mismatch rather than panicking. Anything
//! without a dedicated variant (null, arrays, plain nested objects) survives
//! untouched as `Raw`.
//!
//! Decoding dispatches on the `__type` discriminator once, here, so adding a
//! new wire type is one new match arm.

use serde_json::{Number, Value as Json};

use crate::error::Error;
use crate::pointer::{Pointer, POINTER_TYPE, TYPE_KEY};

/// One field value: a JSON scalar, a typed reference, or an opaque JSON
/// value kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(Number),
    Bool(bool),
    Pointer(Pointer),
    Raw(Json),
}

impl Value {
    /// The stored string, or `None` if this value is not a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The stored number as `f64`, or `None` if this value is not a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// The stored number as `i64`, or `None` if not an integral number.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// The stored boolean, or `None` if this value is not a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The stored pointer, or `None` if this value is not a pointer.
    pub fn as_pointer(&self) -> Option<&Pointer> {
        match self {
            Value::Pointer(p) => Some(p),
            _ => None,
        }
    }

    /// Serialize to the JSON wire form. Pointers go through the pointer
    /// codec; everything else is its JSON self.
    pub fn to_wire(&self) -> Json {
        match self {
            Value::String(s) => Json::String(s.clone()),
            Value::Number(n) => Json::Number(n.clone()),
            Value::Bool(b) => Json::Bool(*b),
            Value::Pointer(p) => p.encode(),
            Value::Raw(j) => j.clone(),
        }
    }

    /// Decode one field's wire value.
    ///
    /// Wire objects carrying a `__type` discriminator dispatch on it:
    /// `"Pointer"` decodes through the pointer codec, `"Date"` is explicitly
    /// unsupported and fails, any other discriminator is kept raw. Scalars
    /// map to their typed variants; null, arrays, and untagged objects stay
    /// raw. The `field` argument names the field for error reporting.
    pub fn from_wire(field: &str, wire: &Json) -> Result<Self, Error> {
        if let Some(tag) = wire.get(TYPE_KEY).and_then(Json::as_str) {
            return match tag {
                POINTER_TYPE => Pointer::decode(field, wire).map(Value::Pointer),
                "Date" => Err(Error::FieldDecode {
                    field: field.to_string(),
                    reason: "Date values are not supported".to_string(),
                }),
                _ => Ok(Value::Raw(wire.clone())),
            };
        }

        Ok(match wire {
            Json::String(s) => Value::String(s.clone()),
            Json::Number(n) => Value::Number(n.clone()),
            Json::Bool(b) => Value::Bool(*b),
            other => Value::Raw(other.clone()),
        })
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        // Non-finite floats have no JSON representation; store them raw as null.
        match Number::from_f64(n) {
            Some(number) => Value::Number(number),
            None => Value::Raw(Json::Null),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Pointer> for Value {
    fn from(p: Pointer) -> Self {
        Value::Pointer(p)
    }
}

impl From<Json> for Value {
    fn from(j: Json) -> Self {
        Value::Raw(j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_decode_to_typed_variants() {
        assert_eq!(
            Value::from_wire("name", &json!("Sean")).unwrap(),
            Value::String("Sean".to_string())
        );
        assert_eq!(Value::from_wire("score", &json!(42)).unwrap().as_i64(), Some(42));
        assert_eq!(
            Value::from_wire("cheatMode", &json!(false)).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn null_arrays_and_untagged_objects_stay_raw() {
        assert_eq!(Value::from_wire("x", &Json::Null).unwrap(), Value::Raw(Json::Null));
        let array = json!([1, 2, 3]);
        assert_eq!(Value::from_wire("x", &array).unwrap(), Value::Raw(array.clone()));
        let nested = json!({"a": 1});
        assert_eq!(Value::from_wire("x", &nested).unwrap(), Value::Raw(nested.clone()));
    }

    #[test]
    fn pointer_discriminator_decodes_through_codec() {
        let wire = json!({"__type": "Pointer", "className": "Player", "objectId": "abc123"});
        let value = Value::from_wire("owner", &wire).unwrap();
        let pointer = value.as_pointer().unwrap();
        assert_eq!(pointer.class_name(), "Player");
        assert_eq!(pointer.object_id(), "abc123");
    }

    #[test]
    fn date_discriminator_is_a_decode_failure() {
        let wire = json!({"__type": "Date", "iso": "2024-01-01T00:00:00Z"});
        let err = Value::from_wire("when", &wire).unwrap_err();
        assert!(matches!(err, Error::FieldDecode { ref field, .. } if field == "when"));
    }

    #[test]
    fn unknown_discriminator_is_kept_raw() {
        let wire = json!({"__type": "File", "name": "photo.png"});
        assert_eq!(Value::from_wire("photo", &wire).unwrap(), Value::Raw(wire.clone()));
    }

    #[test]
    fn malformed_pointer_is_a_decode_failure() {
        let wire = json!({"__type": "Pointer", "className": "Player"});
        assert!(Value::from_wire("owner", &wire).is_err());
    }

    #[test]
    fn accessors_return_none_on_type_mismatch() {
        let value = Value::String("not a number".to_string());
        assert!(value.as_f64().is_none());
        assert!(value.as_bool().is_none());
        assert!(value.as_pointer().is_none());
        assert_eq!(value.as_str(), Some("not a number"));
    }

    #[test]
    fn pointer_value_round_trips_through_wire_form() {
        let value = Value::from(Pointer::new("Player", "abc123"));
        let back = Value::from_wire("owner", &value.to_wire()).unwrap();
        assert_eq!(back, value);
    }
}
