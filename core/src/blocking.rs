//! Blocking transport over ureq.

use serde_json::Value;
use ureq::{Agent, RequestBuilder};

use crate::client::{Outcome, ShortcutClient};
use crate::config::Config;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::operation::{Operation, QueryValue};

/// Executes operations on the calling thread.
///
/// The agent keeps its own keep-alive pool; each `execute` is still exactly
/// one request with no retry.
#[derive(Clone)]
pub struct BlockingClient {
    inner: ShortcutClient,
    agent: Agent,
}

impl BlockingClient {
    pub fn new(config: Config) -> Self {
        // 4xx/5xx come back as data so `normalize` can read the body.
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout())
            .build()
            .new_agent();
        Self {
            inner: ShortcutClient::new(config),
            agent,
        }
    }

    pub fn config(&self) -> &Config {
        self.inner.config()
    }

    pub fn execute(&self, op: &Operation) -> Outcome {
        let request = self.inner.build_request(op)?;
        self.inner.log_dispatch(&request);
        let response = self.send(&request)?;
        self.inner.normalize(&request, response)
    }

    /// Raw entry point: method name, path, query and body.
    pub fn call(
        &self,
        method: &str,
        path: &str,
        query: Vec<(String, QueryValue)>,
        body: Option<Value>,
    ) -> Outcome {
        let mut op = Operation::parse(method, path)?.with_query_pairs(query);
        if let Some(body) = body {
            op = op.with_body(body);
        }
        self.execute(&op)
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), request).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), request).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), request).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), request).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(url), request).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), request).send_empty(),
        };
        let mut response = result.map_err(ApiError::transport)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        // No size cap: a response that arrived is normalized, never a transport error.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(ApiError::transport)?;

        Ok(HttpResponse::from_bytes(status, headers, &body))
    }
}

fn with_headers<B>(builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    request
        .headers
        .iter()
        .fold(builder, |b, (name, value)| b.header(name.as_str(), value.as_str()))
}
