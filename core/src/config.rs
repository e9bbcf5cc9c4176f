//! Process-wide client configuration.
//!
//! # Design
//! The application identifier and REST access key are set once at startup and
//! read for every request. They live in an explicit `Config` value injected
//! into the [`Client`](crate::Client) rather than in global statics, so tests
//! can run several differently-configured clients side by side.

use crate::http::{HEADER_APPLICATION_ID, HEADER_REST_API_KEY};

/// Immutable client configuration: backend base URL, credentials, and an
/// optional outbound HTTP proxy.
#[derive(Debug, Clone)]
pub struct Config {
    server_url: String,
    application_id: String,
    rest_api_key: String,
    proxy: Option<ProxyConfig>,
}

/// Outbound HTTP proxy settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn new(server_url: &str, application_id: &str, rest_api_key: &str) -> Self {
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            application_id: application_id.to_string(),
            rest_api_key: rest_api_key.to_string(),
            proxy: None,
        }
    }

    /// Route all requests through the given HTTP proxy.
    pub fn with_proxy(mut self, host: &str, port: u16) -> Self {
        self.proxy = Some(ProxyConfig {
            host: host.to_string(),
            port,
        });
        self
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn rest_api_key(&self) -> &str {
        &self.rest_api_key
    }

    pub fn proxy(&self) -> Option<&ProxyConfig> {
        self.proxy.as_ref()
    }

    /// URL of the collection resource for a class:
    /// `<base>/classes/<className>`.
    pub fn class_url(&self, class_name: &str) -> String {
        format!("{}/classes/{}", self.server_url, class_name)
    }

    /// URL of one object within a class:
    /// `<base>/classes/<className>/<objectId>`.
    pub fn object_url(&self, class_name: &str, object_id: &str) -> String {
        format!("{}/classes/{}/{}", self.server_url, class_name, object_id)
    }

    /// The two credential headers attached to every request.
    pub fn auth_headers(&self) -> Vec<(String, String)> {
        vec![
            (HEADER_APPLICATION_ID.to_string(), self.application_id.clone()),
            (HEADER_REST_API_KEY.to_string(), self.rest_api_key.clone()),
        ]
    }
}
