//! Configured entry point tying configuration to a transport.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::transport::UreqTransport;

/// A configured client: immutable [`Config`] plus the [`Transport`] that
/// executes requests.
///
/// Cheap to clone (both halves are behind `Arc`), and `Send`, so background
/// operations carry their own copy.
#[derive(Clone)]
pub struct Client {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Build a client with the default [`UreqTransport`].
    pub fn new(config: Config) -> Result<Self, Error> {
        let transport = UreqTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build a client with a caller-supplied transport. Tests use this to
    /// script responses without a network.
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute one blocking round trip through the configured transport.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        self.transport.execute(request)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").field("config", &self.config).finish_non_exhaustive()
    }
}
