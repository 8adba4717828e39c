//! Stateless request builder and response normalizer for the Shortcut API.
//!
//! # Design
//! `ShortcutClient` holds only the shared `Config` and carries no mutable
//! state between calls. `build_request` turns an `Operation` into an
//! `HttpRequest`; `normalize` turns the `HttpResponse` into an `Outcome`.
//! The transports in `blocking` and `nonblocking` execute the round-trip in
//! between, so both variants share these two functions verbatim.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::{Config, TOKEN_HEADER};
use crate::error::{raw_response, ApiError};
use crate::http::{HttpRequest, HttpResponse};
use crate::operation::{Operation, QueryValue};

/// Result of one call: a payload, no content (HTTP 204), or a failure.
pub type Outcome = Result<Option<Value>, ApiError>;

#[derive(Debug, Clone)]
pub struct ShortcutClient {
    config: Arc<Config>,
}

impl ShortcutClient {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn build_request(&self, op: &Operation) -> Result<HttpRequest, ApiError> {
        let joined = join_url(self.config.base_url(), op.path());
        let mut url = Url::parse(&joined).map_err(|e| ApiError::InvalidUrl {
            url: joined.clone(),
            message: e.to_string(),
        })?;

        let pairs = query_pairs(op.query());
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        let body = match op.body() {
            Some(body) if op.method().carries_body() => Some(
                serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?,
            ),
            _ => None,
        };

        Ok(HttpRequest {
            method: op.method(),
            url: url.into(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                (TOKEN_HEADER.to_string(), self.config.api_token().to_string()),
            ],
            body,
        })
    }

    pub fn normalize(&self, request: &HttpRequest, response: HttpResponse) -> Outcome {
        if response.is_success() {
            if response.status == 204 {
                return Ok(None);
            }
            return serde_json::from_str(&response.body)
                .map(Some)
                .map_err(|e| {
                    warn!(
                        status = response.status,
                        url = %request.url,
                        error = %e,
                        "Shortcut API returned malformed JSON"
                    );
                    ApiError::InvalidResponse {
                        status: response.status,
                        message: e.to_string(),
                        raw: response.body,
                    }
                });
        }

        let details = serde_json::from_str::<Value>(&response.body)
            .unwrap_or_else(|_| raw_response(&response.body));
        warn!(
            status = response.status,
            method = %request.method,
            url = %request.url,
            %details,
            "Shortcut API request failed"
        );
        Err(ApiError::Api {
            status: response.status,
            method: request.method,
            url: request.url.clone(),
            details,
        })
    }

    pub(crate) fn log_dispatch(&self, request: &HttpRequest) {
        debug!(method = %request.method, url = %request.url, "sending request to Shortcut API");
    }
}

/// Join base URL and path with exactly one separating slash.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn query_pairs(query: &[(String, QueryValue)]) -> Vec<(&str, &str)> {
    query
        .iter()
        .flat_map(|(key, value)| {
            let values: Vec<&str> = match value {
                QueryValue::Scalar(v) => vec![v.as_str()],
                QueryValue::List(items) => items.iter().map(String::as_str).collect(),
            };
            values.into_iter().map(move |v| (key.as_str(), v))
        })
        .collect()
}
