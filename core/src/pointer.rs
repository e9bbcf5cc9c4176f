//! Typed references between objects and their wire codec.
//!
//! A pointer names another object by `(className, objectId)` without
//! embedding its fields. On the wire it is a JSON object tagged with the
//! `__type` discriminator `"Pointer"`:
//!
//! ```json
//! {"__type": "Pointer", "className": "Player", "objectId": "abc123"}
//! ```
//!
//! This codec handles only the `"Pointer"` discriminator. Other typed wire
//! values (dates, files) need their own codec variants; decoding refuses them
//! rather than guessing.

use serde_json::{json, Value as Json};

use crate::error::Error;

/// Wire discriminator key for typed values.
pub const TYPE_KEY: &str = "__type";

/// Discriminator value this codec encodes and decodes.
pub const POINTER_TYPE: &str = "Pointer";

/// A reference to another object by class name and object id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    class_name: String,
    object_id: String,
}

impl Pointer {
    pub fn new(class_name: &str, object_id: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            object_id: object_id.to_string(),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    /// Encode to the tagged wire form. Exact inverse of [`Pointer::decode`].
    pub fn encode(&self) -> Json {
        json!({
            TYPE_KEY: POINTER_TYPE,
            "className": self.class_name,
            "objectId": self.object_id,
        })
    }

    /// Decode a tagged wire object back into a pointer.
    ///
    /// Fails if the discriminator is absent or not `"Pointer"`, or if either
    /// required sub-field is missing or not a string. The `field` argument
    /// names the field being decoded, for error reporting.
    pub fn decode(field: &str, wire: &Json) -> Result<Self, Error> {
        let fail = |reason: &str| Error::FieldDecode {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        match wire.get(TYPE_KEY).and_then(Json::as_str) {
            Some(POINTER_TYPE) => {}
            Some(other) => return Err(fail(&format!("expected Pointer, found __type {other:?}"))),
            None => return Err(fail("missing __type discriminator")),
        }

        let class_name = wire
            .get("className")
            .and_then(Json::as_str)
            .ok_or_else(|| fail("missing className"))?;
        let object_id = wire
            .get("objectId")
            .and_then(Json::as_str)
            .ok_or_else(|| fail("missing objectId"))?;

        Ok(Pointer::new(class_name, object_id))
    }
}
