//! The mapped entity: a local record that saves to and loads from the
//! backend.
//!
//! # Design
//! An `Object` is a class name plus an exclusively-owned [`FieldMap`]. The
//! basic write workflow is construct, `put`, `save`; reads come back through
//! [`Query`](crate::Query), which reconstructs objects via
//! [`Object::from_wire`].
//!
//! Network operations follow the build/parse split used across this crate:
//! `build_*`
//! produces an [`HttpRequest`], `apply_*`/`parse_*` consumes an
//! [`HttpResponse`], and the executing wrappers (`save`, `delete`) glue the
//! two through a [`Client`]. Unit tests exercise build/parse without any
//! network.

use serde::Deserialize;
use serde_json::Value as Json;
use tracing::warn;

use crate::background::{self, BackgroundHandle};
use crate::client::Client;
use crate::config::Config;
use crate::error::{check_class_name, Error};
use crate::fields::{FieldMap, KEY_CREATED_AT, KEY_OBJECT_ID};
use crate::http::{failure_from, HttpMethod, HttpRequest, HttpResponse};
use crate::pointer::Pointer;
use crate::value::Value;

/// Identity fields a successful save response must carry.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedIdentity {
    object_id: String,
    created_at: String,
}

/// A local representation of one backend resource instance.
///
/// Identified by `(class_name, object_id)`. The object id is assigned by the
/// backend on the first successful save; until then the object is local
/// only.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    class_name: String,
    fields: FieldMap,
}

impl Object {
    /// Create an empty, unpersisted object.
    ///
    /// Class names must start with a letter and contain only alphanumerics
    /// and underscores. Name classes in CamelCaseLikeThis.
    pub fn new(class_name: &str) -> Result<Self, Error> {
        check_class_name(class_name)?;
        Ok(Self {
            class_name: class_name.to_string(),
            fields: FieldMap::new(),
        })
    }

    /// Reconstruct an object from its wire JSON form.
    ///
    /// Best-effort: each field decodes via [`Value::from_wire`]; a field
    /// whose wire value is malformed is skipped with a warning and the rest
    /// of the object still materializes. A wire value that is not a JSON
    /// object at all is a malformed response.
    pub fn from_wire(class_name: &str, wire: &Json) -> Result<Self, Error> {
        let map = wire.as_object().ok_or_else(|| {
            Error::MalformedResponse(format!("expected a JSON object, found {wire}"))
        })?;

        let mut object = Object::new(class_name)?;
        for (name, raw) in map {
            match Value::from_wire(name, raw) {
                Ok(value) => object.fields.put(name, value),
                Err(err) => warn!(field = %name, %err, "skipping undecodable field"),
            }
        }
        Ok(object)
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The backend-assigned id, absent until the first successful save.
    pub fn object_id(&self) -> Option<&str> {
        self.get_string(KEY_OBJECT_ID)
    }

    /// The backend-assigned creation timestamp, absent until the first
    /// successful save.
    pub fn created_at(&self) -> Option<&str> {
        self.get_string(KEY_CREATED_AT)
    }

    /// Whether this object exists on the backend (has an object id).
    pub fn is_persisted(&self) -> bool {
        self.object_id().is_some()
    }

    /// Set the object id directly. Normally the backend assigns it on save;
    /// use this only when recreating an object you serialized yourself.
    pub fn set_object_id(&mut self, object_id: &str) {
        self.fields.put(KEY_OBJECT_ID, object_id);
    }

    pub fn set_created_at(&mut self, created_at: &str) {
        self.fields.put(KEY_CREATED_AT, created_at);
    }

    /// Store a field value, replacing any previous value under that name.
    pub fn put(&mut self, name: &str, value: impl Into<Value>) {
        self.fields.put(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// String accessor: `None` if the field is absent or not a string.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.fields.get(name)?.as_str()
    }

    /// Pointer accessor: `None` if the field is absent or not a pointer.
    pub fn get_pointer(&self, name: &str) -> Option<&Pointer> {
        self.fields.get(name)?.as_pointer()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// A pointer at this object's own identity, for other objects to
    /// reference it without embedding it. Requires a persisted object.
    pub fn to_pointer(&self) -> Result<Pointer, Error> {
        let object_id = self.object_id().ok_or(Error::NotPersisted("to_pointer"))?;
        Ok(Pointer::new(&self.class_name, object_id))
    }

    /// Build the save request: POST of the full field map to the class
    /// collection, pointers in their encoded wire form.
    pub fn build_save(&self, config: &Config) -> HttpRequest {
        let mut headers = config.auth_headers();
        headers.push(("Content-Type".to_string(), "application/json".to_string()));
        HttpRequest {
            method: HttpMethod::Post,
            url: config.class_url(&self.class_name),
            headers,
            body: Some(self.fields.to_wire().to_string()),
        }
    }

    /// Interpret a save response, writing `objectId` and `createdAt` back
    /// into the field store on success.
    ///
    /// On any failure the persisted-identity fields are left untouched: an
    /// empty body is a connection failure, an unparseable body on a 2xx is a
    /// connection failure too (the round trip did not produce a usable
    /// response), and a parseable 2xx body without both identity fields is a
    /// malformed response.
    pub fn apply_save_response(&mut self, response: HttpResponse) -> Result<(), Error> {
        if response.body.trim().is_empty() {
            return Err(Error::Connection(format!(
                "empty response body (status {})",
                response.status
            )));
        }
        if !response.is_success() {
            return Err(failure_from(&response));
        }

        let body: Json = serde_json::from_str(&response.body).map_err(|err| {
            Error::Connection(format!("save response body was not valid JSON: {err}"))
        })?;
        let saved: SavedIdentity = serde_json::from_value(body).map_err(|err| {
            Error::MalformedResponse(format!("save response missing identity fields: {err}"))
        })?;

        self.set_object_id(&saved.object_id);
        self.set_created_at(&saved.created_at);
        Ok(())
    }

    /// Build the delete request for this object's backend resource.
    /// Requires a persisted object.
    pub fn build_delete(&self, config: &Config) -> Result<HttpRequest, Error> {
        let object_id = self.object_id().ok_or(Error::NotPersisted("delete"))?;
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            url: config.object_url(&self.class_name, object_id),
            headers: config.auth_headers(),
            body: None,
        })
    }

    /// Interpret a delete response. Success leaves local state intact; the
    /// caller discards the object when done with it.
    pub fn parse_delete_response(response: HttpResponse) -> Result<(), Error> {
        if response.body.trim().is_empty() {
            return Err(Error::Connection(format!(
                "empty response body (status {})",
                response.status
            )));
        }
        if response.is_success() {
            Ok(())
        } else {
            Err(failure_from(&response))
        }
    }

    /// Save this object, blocking until the round trip completes. The first
    /// successful save assigns `objectId` and `createdAt`.
    pub fn save(&mut self, client: &Client) -> Result<(), Error> {
        let request = self.build_save(client.config());
        let response = client.execute(&request)?;
        self.apply_save_response(response)
    }

    /// Delete this object on the backend, blocking until the round trip
    /// completes. The local object is not cleared.
    pub fn delete(&self, client: &Client) -> Result<(), Error> {
        let request = self.build_delete(client.config())?;
        let response = client.execute(&request)?;
        Self::parse_delete_response(response)
    }

    /// Save on a background thread. The callback fires exactly once with the
    /// saved object (identity fields populated) or the error, never on the
    /// submitting thread.
    pub fn save_in_background<C>(mut self, client: &Client, callback: C) -> BackgroundHandle
    where
        C: FnOnce(Result<Object, Error>) + Send + 'static,
    {
        let client = client.clone();
        background::submit(move || self.save(&client).map(|()| self), callback)
    }

    /// Delete on a background thread. Same callback contract as
    /// [`save_in_background`](Object::save_in_background).
    pub fn delete_in_background<C>(self, client: &Client, callback: C) -> BackgroundHandle
    where
        C: FnOnce(Result<(), Error>) + Send + 'static,
    {
        let client = client.clone();
        background::submit(move || self.delete(&client), callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> Config {
        Config::new("http://localhost:3000", "app-id", "rest-key")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn new_object_is_unpersisted() {
        let object = Object::new("GameScore").unwrap();
        assert!(!object.is_persisted());
        assert!(object.object_id().is_none());
        assert!(object.created_at().is_none());
    }

    #[test]
    fn new_rejects_invalid_class_name() {
        assert!(matches!(Object::new(""), Err(Error::InvalidClassName(_))));
        assert!(Object::new("2fast").is_err());
    }

    #[test]
    fn typed_accessors_are_none_on_missing_or_mismatched_fields() {
        let mut object = Object::new("GameScore").unwrap();
        object.put("score", 1337);
        assert!(object.get_string("score").is_none());
        assert!(object.get_string("missing").is_none());
        assert!(object.get_pointer("score").is_none());
        assert_eq!(object.get("score").unwrap().as_i64(), Some(1337));
    }

    #[test]
    fn to_pointer_requires_persistence() {
        let mut object = Object::new("Player").unwrap();
        assert!(matches!(object.to_pointer(), Err(Error::NotPersisted(_))));

        object.set_object_id("abc123");
        let pointer = object.to_pointer().unwrap();
        assert_eq!(pointer.class_name(), "Player");
        assert_eq!(pointer.object_id(), "abc123");
    }

    #[test]
    fn from_wire_decodes_pointer_fields() {
        let wire = json!({
            "objectId": "xyz",
            "playerName": "Sean",
            "owner": {"__type": "Pointer", "className": "Player", "objectId": "abc123"},
        });
        let object = Object::from_wire("GameScore", &wire).unwrap();
        assert_eq!(object.object_id(), Some("xyz"));
        assert_eq!(object.get_string("playerName"), Some("Sean"));
        let pointer = object.get_pointer("owner").unwrap();
        assert_eq!((pointer.class_name(), pointer.object_id()), ("Player", "abc123"));
    }

    #[test]
    fn from_wire_skips_undecodable_fields_and_keeps_the_rest() {
        let wire = json!({
            "playerName": "Sean",
            "when": {"__type": "Date", "iso": "2024-01-01T00:00:00Z"},
            "broken": {"__type": "Pointer", "className": "Player"},
        });
        let object = Object::from_wire("GameScore", &wire).unwrap();
        assert_eq!(object.get_string("playerName"), Some("Sean"));
        assert!(!object.contains("when"));
        assert!(!object.contains("broken"));
    }

    #[test]
    fn from_wire_rejects_non_object_wire_values() {
        assert!(matches!(
            Object::from_wire("GameScore", &json!([1, 2])),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn build_save_posts_full_field_map_with_headers() {
        let mut object = Object::new("GameScore").unwrap();
        object.put("score", 1337);
        object.put("owner", Pointer::new("Player", "abc123"));

        let request = object.build_save(&config());
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "http://localhost:3000/classes/GameScore");
        assert!(request
            .headers
            .contains(&("X-Cirrus-Application-Id".to_string(), "app-id".to_string())));
        assert!(request
            .headers
            .contains(&("Content-Type".to_string(), "application/json".to_string())));

        let body: Json = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["score"], 1337);
        assert_eq!(body["owner"]["__type"], "Pointer");
    }

    #[test]
    fn successful_save_assigns_identity() {
        let mut object = Object::new("GameScore").unwrap();
        object.put("score", 1337);

        let body = r#"{"objectId":"abc123","createdAt":"2024-01-01T00:00:00Z"}"#;
        object.apply_save_response(response(201, body)).unwrap();

        assert_eq!(object.object_id(), Some("abc123"));
        assert_eq!(object.created_at(), Some("2024-01-01T00:00:00Z"));
        assert!(object.is_persisted());
    }

    #[test]
    fn failed_save_leaves_identity_untouched() {
        let mut object = Object::new("GameScore").unwrap();
        let err = object
            .apply_save_response(response(404, r#"{"code":101,"error":"object not found"}"#))
            .unwrap_err();
        assert!(matches!(err, Error::Remote { code: 101, .. }));
        assert!(object.object_id().is_none());
    }

    #[test]
    fn save_with_empty_body_is_a_connection_failure() {
        let mut object = Object::new("GameScore").unwrap();
        let err = object.apply_save_response(response(200, "")).unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
        assert!(object.object_id().is_none());
    }

    #[test]
    fn save_with_unparseable_body_is_a_connection_failure() {
        let mut object = Object::new("GameScore").unwrap();
        let err = object.apply_save_response(response(200, "not json")).unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
    }

    #[test]
    fn save_response_missing_identity_is_malformed() {
        let mut object = Object::new("GameScore").unwrap();
        let err = object
            .apply_save_response(response(200, r#"{"objectId":"abc123"}"#))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
        assert!(object.object_id().is_none());
    }

    #[test]
    fn build_delete_requires_persistence() {
        let object = Object::new("GameScore").unwrap();
        assert!(matches!(
            object.build_delete(&config()),
            Err(Error::NotPersisted("delete"))
        ));
    }

    #[test]
    fn build_delete_targets_the_object_resource() {
        let mut object = Object::new("GameScore").unwrap();
        object.set_object_id("abc123");

        let request = object.build_delete(&config()).unwrap();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.url, "http://localhost:3000/classes/GameScore/abc123");
        assert!(request.body.is_none());
    }

    #[test]
    fn delete_response_handling_mirrors_save() {
        assert!(Object::parse_delete_response(response(200, "{}")).is_ok());
        assert!(matches!(
            Object::parse_delete_response(response(404, r#"{"code":101,"error":"object not found"}"#)),
            Err(Error::Remote { code: 101, .. })
        ));
        assert!(matches!(
            Object::parse_delete_response(response(200, "")),
            Err(Error::Connection(_))
        ));
    }
}
