//! Default blocking transport built on ureq.

use tracing::debug;

use crate::config::Config;
use crate::error::Error;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

/// Blocking [`Transport`] backed by a shared [`ureq::Agent`].
///
/// Non-2xx statuses are returned as data (`http_status_as_error` disabled)
/// so the object and query layers can interpret the backend's error body.
/// Honors the outbound proxy from [`Config`], when set.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut builder = ureq::Agent::config_builder().http_status_as_error(false);
        if let Some(proxy) = config.proxy() {
            let url = format!("http://{}:{}", proxy.host, proxy.port);
            let proxy = ureq::Proxy::new(&url)
                .map_err(|err| Error::Connection(format!("invalid proxy {url}: {err}")))?;
            builder = builder.proxy(Some(proxy));
        }
        Ok(Self {
            agent: builder.build().new_agent(),
        })
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        debug!(method = ?request.method, url = %request.url, "executing request");

        let result = match (request.method, &request.body) {
            (HttpMethod::Get, _) => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                builder.call()
            }
            (HttpMethod::Delete, _) => {
                let mut builder = self.agent.delete(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                builder.call()
            }
            (HttpMethod::Post, Some(body)) => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                builder.send(body.as_bytes())
            }
            (HttpMethod::Post, None) => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                builder.send_empty()
            }
        };

        let mut response = result.map_err(|err| Error::Connection(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| Error::Connection(format!("failed to read response body: {err}")))?;

        debug!(status, "request completed");
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}
