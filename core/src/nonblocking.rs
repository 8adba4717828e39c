//! Async transport over reqwest.

use serde_json::Value;

use crate::client::{Outcome, ShortcutClient};
use crate::config::{Config, ConfigError};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::operation::{Operation, QueryValue};

/// Executes operations on the caller's async runtime.
///
/// Clones share the underlying connection pool, so one client can serve any
/// number of concurrent calls. Every failure is returned as a value; a failed
/// call never tears down its siblings.
#[derive(Debug, Clone)]
pub struct AsyncClient {
    inner: ShortcutClient,
    http: reqwest::Client,
}

impl AsyncClient {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            inner: ShortcutClient::new(config),
            http,
        })
    }

    pub fn config(&self) -> &Config {
        self.inner.config()
    }

    pub async fn execute(&self, op: &Operation) -> Outcome {
        let request = self.inner.build_request(op)?;
        self.inner.log_dispatch(&request);
        let response = self.send(&request).await?;
        self.inner.normalize(&request, response)
    }

    /// Raw entry point: method name, path, query and body.
    pub async fn call(
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
        self.execute(&op).await
    }

    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.http.request(to_reqwest(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(ApiError::transport)?;

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
        let body = response.bytes().await.map_err(ApiError::transport)?;

        Ok(HttpResponse::from_bytes(status, headers, &body))
    }
}

fn to_reqwest(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}
