//! HTTP types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. The object and query layers build
//! `HttpRequest` values and parse `HttpResponse` values without touching the
//! network; the [`Transport`] trait is the one place I/O happens. Tests swap
//! in scripted transports, production uses [`UreqTransport`].
//!
//! All fields use owned types (`String`, `Vec`) so values can move freely
//! into background tasks.
//!
//! [`UreqTransport`]: crate::transport::UreqTransport

use crate::error::Error;

/// Header carrying the application identifier on every request.
pub const HEADER_APPLICATION_ID: &str = "X-Cirrus-Application-Id";

/// Header carrying the REST access key on every request.
pub const HEADER_REST_API_KEY: &str = "X-Cirrus-REST-API-Key";

/// HTTP method for a request. Only the methods the backend's class API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

/// An HTTP request described as plain data.
///
/// Built by `Object::build_*` and `Query::build_*` methods, executed by a
/// [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is in the 2xx success range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one HTTP round trip to completion, blocking the calling thread.
///
/// Implementations return `Err(Error::Connection)` only when no usable
/// response was obtained; non-2xx statuses come back as an `Ok` response so
/// the caller can interpret the backend's error body.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error>;
}

/// Shape of the backend's non-2xx error body.
#[derive(serde::Deserialize)]
struct ErrorBody {
    code: i64,
    error: String,
}

/// Interpret a non-success response as an [`Error`].
///
/// An empty body means the round trip never produced a usable response; a
/// parseable `{"code", "error"}` body is the backend speaking; anything else
/// is a malformed response.
pub(crate) fn failure_from(response: &HttpResponse) -> Error {
    if response.body.trim().is_empty() {
        return Error::Connection(format!(
            "empty response body (status {})",
            response.status
        ));
    }
    match serde_json::from_str::<ErrorBody>(&response.body) {
        Ok(body) => Error::Remote {
            code: body.code,
            message: body.error,
        },
        Err(err) => Error::MalformedResponse(format!(
            "status {} with unrecognized error body: {err}",
            response.status
        )),
    }
}
