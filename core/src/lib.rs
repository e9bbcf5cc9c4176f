//! Client SDK mapping local dynamically-typed objects to resources on a
//! document-style HTTP backend.
//!
//! # Overview
//! Construct an [`Object`], fill it with [`Object::put`], and persist it
//! with [`Object::save`]; read existing data back through a [`Query`].
//! Objects reference each other with typed [`Pointer`] values rather than
//! embedding.
//!
//! # Design
//! - [`Config`] holds the application id, REST key, and base URL —
//!   injected into a [`Client`], never global.
//! - Every network operation is split into a `build_*` method producing an
//!   [`HttpRequest`] and a `parse_*`/`apply_*` method consuming an
//!   [`HttpResponse`], so the wire logic is testable without I/O. The
//!   [`Transport`] trait is the single seam where I/O happens;
//!   [`UreqTransport`] is the blocking default.
//! - Field values are a closed tagged union ([`Value`]); typed accessors
//!   return `None` on absence or mismatch instead of panicking.
//! - `*_in_background` variants run the same blocking call on a spawned
//!   thread and deliver the result through a completion callback exactly
//!   once.

pub mod background;
pub mod client;
pub mod config;
pub mod error;
pub mod fields;
pub mod http;
pub mod object;
pub mod pointer;
pub mod query;
pub mod transport;
pub mod value;

pub use background::BackgroundHandle;
pub use client::Client;
pub use config::{Config, ProxyConfig};
pub use error::Error;
pub use fields::{FieldMap, KEY_CREATED_AT, KEY_OBJECT_ID};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use object::Object;
pub use pointer::Pointer;
pub use query::Query;
pub use transport::UreqTransport;
pub use value::Value;
