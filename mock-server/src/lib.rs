//! In-memory rendition of the document backend, for integration tests and
//! local development.
//!
//! Speaks the class API: `POST /classes/{class}` to create,
//! `GET /classes/{class}` to list (with an optional `where=` equality
//! filter), `GET`/`DELETE /classes/{class}/{id}` for one object. Every
//! request must carry the application id and REST key headers. Error bodies
//! are `{"code": int, "error": string}`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Query as UrlParams, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const HEADER_APPLICATION_ID: &str = "X-Cirrus-Application-Id";
pub const HEADER_REST_API_KEY: &str = "X-Cirrus-REST-API-Key";

pub const CODE_OBJECT_NOT_FOUND: i64 = 101;
pub const CODE_INVALID_QUERY: i64 = 102;
pub const CODE_INVALID_JSON: i64 = 107;
pub const CODE_UNAUTHORIZED: i64 = 119;

/// class name -> object id -> stored fields. BTreeMap keeps listing order
/// deterministic for a given set of ids.
type Classes = HashMap<String, BTreeMap<String, Map<String, Value>>>;

pub type Db = Arc<RwLock<Classes>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/classes/{class}", get(find_objects).post(create_object))
        .route("/classes/{class}/{id}", get(get_object).delete(delete_object))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

type Reply = (StatusCode, Json<Value>);

fn error(status: StatusCode, code: i64, message: &str) -> Reply {
    (status, Json(json!({"code": code, "error": message})))
}

fn not_found() -> Reply {
    error(StatusCode::NOT_FOUND, CODE_OBJECT_NOT_FOUND, "object not found")
}

fn check_auth(headers: &HeaderMap) -> Result<(), Reply> {
    let present = |name: &str| headers.get(name).is_some_and(|value| !value.is_empty());
    if present(HEADER_APPLICATION_ID) && present(HEADER_REST_API_KEY) {
        Ok(())
    } else {
        Err(error(StatusCode::UNAUTHORIZED, CODE_UNAUTHORIZED, "unauthorized"))
    }
}

/// Backend-style object id: 10 hex characters.
fn new_object_id() -> String {
    Uuid::new_v4().simple().to_string()[..10].to_string()
}

fn matches_filter(object: &Map<String, Value>, filter: Option<&Map<String, Value>>) -> bool {
    match filter {
        Some(constraints) => constraints.iter().all(|(name, value)| object.get(name) == Some(value)),
        None => true,
    }
}

async fn create_object(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(class): Path<String>,
    body: String,
) -> Reply {
    if let Err(reply) = check_auth(&headers) {
        return reply;
    }
    let fields = match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(map)) => map,
        _ => return error(StatusCode::BAD_REQUEST, CODE_INVALID_JSON, "invalid JSON body"),
    };

    let object_id = new_object_id();
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut stored = fields;
    stored.insert("objectId".to_string(), json!(object_id));
    stored.insert("createdAt".to_string(), json!(created_at));
    db.write()
        .await
        .entry(class)
        .or_default()
        .insert(object_id.clone(), stored);

    (
        StatusCode::CREATED,
        Json(json!({"objectId": object_id, "createdAt": created_at})),
    )
}

async fn find_objects(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(class): Path<String>,
    UrlParams(params): UrlParams<HashMap<String, String>>,
) -> Reply {
    if let Err(reply) = check_auth(&headers) {
        return reply;
    }
    let filter = match params.get("where") {
        None => None,
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Some(map),
            _ => {
                return error(
                    StatusCode::BAD_REQUEST,
                    CODE_INVALID_QUERY,
                    "invalid where constraint",
                )
            }
        },
    };

    let db = db.read().await;
    let results: Vec<Value> = db
        .get(&class)
        .map(|objects| {
            objects
                .values()
                .filter(|object| matches_filter(object, filter.as_ref()))
                .map(|object| Value::Object(object.clone()))
                .collect()
        })
        .unwrap_or_default();

    (StatusCode::OK, Json(json!({"results": results})))
}

async fn get_object(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((class, id)): Path<(String, String)>,
) -> Reply {
    if let Err(reply) = check_auth(&headers) {
        return reply;
    }
    let db = db.read().await;
    match db.get(&class).and_then(|objects| objects.get(&id)) {
        Some(object) => (StatusCode::OK, Json(Value::Object(object.clone()))),
        None => not_found(),
    }
}

async fn delete_object(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((class, id)): Path<(String, String)>,
) -> Reply {
    if let Err(reply) = check_auth(&headers) {
        return reply;
    }
    let mut db = db.write().await;
    match db.get_mut(&class).and_then(|objects| objects.remove(&id)) {
        Some(_) => (StatusCode::OK, Json(json!({}))),
        None => not_found(),
    }
}
