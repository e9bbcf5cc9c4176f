//! Query compilation and execution against a class-scoped resource.
//!
//! # Design
//! A query targets one class and holds at most one equality constraint. The
//! constraint compiles to a `where=` parameter carrying a single-key JSON
//! object, form-urlencoded so it is transport-safe. Execution follows the
//! same build/parse split as [`Object`]: `build_find`/`parse_find` and
//! `build_get`/`parse_get` never touch the network.

use serde_json::{Map, Value as Json};
use url::form_urlencoded;

use crate::background::{self, BackgroundHandle};
use crate::client::Client;
use crate::config::Config;
use crate::error::{check_class_name, Error};
use crate::http::{failure_from, HttpMethod, HttpRequest, HttpResponse};
use crate::object::Object;
use crate::value::Value;

/// A single-shot query against one class.
#[derive(Debug, Clone)]
pub struct Query {
    class_name: String,
    where_equal_to: Option<(String, Value)>,
}

impl Query {
    pub fn new(class_name: &str) -> Result<Self, Error> {
        check_class_name(class_name)?;
        Ok(Self {
            class_name: class_name.to_string(),
            where_equal_to: None,
        })
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Constrain results to objects whose `field` equals `value`.
    ///
    /// Only one equality constraint is supported; a second call replaces the
    /// first rather than combining with it.
    pub fn where_equal_to(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.where_equal_to = Some((field.to_string(), value.into()));
        self
    }

    /// Compile the constraint into a URL query string.
    ///
    /// Empty when unconstrained, otherwise `?where=<urlencoded JSON>` where
    /// the JSON is a single-key object. Deterministic for a given
    /// constraint.
    pub fn constraint_query_string(&self) -> String {
        match &self.where_equal_to {
            None => String::new(),
            Some((field, value)) => {
                let mut constraint = Map::new();
                constraint.insert(field.clone(), value.to_wire());
                let json = Json::Object(constraint).to_string();
                let encoded = form_urlencoded::Serializer::new(String::new())
                    .append_pair("where", &json)
                    .finish();
                format!("?{encoded}")
            }
        }
    }

    /// Build the list request: GET on the class collection with the
    /// compiled constraint appended.
    pub fn build_find(&self, config: &Config) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!(
                "{}{}",
                config.class_url(&self.class_name),
                self.constraint_query_string()
            ),
            headers: config.auth_headers(),
            body: None,
        }
    }

    /// Interpret a find response, materializing one object per element of
    /// the top-level `results` array.
    ///
    /// Field-level decode failures inside an element are tolerated (the
    /// field is skipped), but a missing or malformed `results` array — or a
    /// non-object element — fails the whole call with no partial list.
    pub fn parse_find(&self, response: HttpResponse) -> Result<Vec<Object>, Error> {
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
            Error::MalformedResponse(format!("find response body was not valid JSON: {err}"))
        })?;
        let results = body
            .get("results")
            .and_then(Json::as_array)
            .ok_or_else(|| {
                Error::MalformedResponse("find response has no results array".to_string())
            })?;

        results
            .iter()
            .map(|element| Object::from_wire(&self.class_name, element))
            .collect()
    }

    /// Build the get-by-id request for one object of this class.
    pub fn build_get(&self, config: &Config, object_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: config.object_url(&self.class_name, object_id),
            headers: config.auth_headers(),
            body: None,
        }
    }

    /// Interpret a get-by-id response as exactly one object. Any non-2xx
    /// status, "not found" included, is a backend error.
    pub fn parse_get(&self, response: HttpResponse) -> Result<Object, Error> {
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
            Error::MalformedResponse(format!("get response body was not valid JSON: {err}"))
        })?;
        Object::from_wire(&self.class_name, &body)
    }

    /// Execute the query, blocking until the round trip completes.
    pub fn find(&self, client: &Client) -> Result<Vec<Object>, Error> {
        let request = self.build_find(client.config());
        let response = client.execute(&request)?;
        self.parse_find(response)
    }

    /// Fetch one object of this class by id, blocking until the round trip
    /// completes.
    pub fn get(&self, client: &Client, object_id: &str) -> Result<Object, Error> {
        let request = self.build_get(client.config(), object_id);
        let response = client.execute(&request)?;
        self.parse_get(response)
    }

    /// Execute on a background thread. The callback fires exactly once with
    /// the result, never on the submitting thread. Consumes the query, so
    /// the compiled constraint cannot change while the find is in flight.
    pub fn find_in_background<C>(self, client: &Client, callback: C) -> BackgroundHandle
    where
        C: FnOnce(Result<Vec<Object>, Error>) + Send + 'static,
    {
        let client = client.clone();
        background::submit(move || self.find(&client), callback)
    }

    /// Fetch by id on a background thread. Same callback contract as
    /// [`find_in_background`](Query::find_in_background).
    pub fn get_in_background<C>(
        self,
        client: &Client,
        object_id: &str,
        callback: C,
    ) -> BackgroundHandle
    where
        C: FnOnce(Result<Object, Error>) + Send + 'static,
    {
        let client = client.clone();
        let object_id = object_id.to_string();
        background::submit(move || self.get(&client, &object_id), callback)
    }
}
