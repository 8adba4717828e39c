//! Error types for the Shortcut API client.
//!
//! # Design
//! Every failure path of a call resolves to one `ApiError` value, grouped in
//! four classes: configuration (`UnsupportedMethod`, `InvalidUrl`,
//! `Serialization`), transport (`Transport`), remote (`Api`) and parse on a
//! success status (`InvalidResponse`). `details()` carries the structured
//! upstream body when one was received.

use serde_json::{json, Value};
use thiserror::Error;

use crate::http::HttpMethod;

/// Errors returned by `BlockingClient` and `AsyncClient` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The caller supplied a method other than GET, POST, PUT or DELETE.
    /// Raised before any network activity.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Base URL and path did not combine into a valid URL.
    #[error("invalid request URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// The request body could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(String),

    /// No response was received: connection refused, DNS, timeout or I/O.
    #[error("error making request to Shortcut API: {message}")]
    Transport { message: String },

    /// The API answered with a non-2xx status.
    #[error("Shortcut API returned {status} for {method} {url}")]
    Api {
        status: u16,
        method: HttpMethod,
        url: String,
        details: Value,
    },

    /// A 2xx response whose body was not valid JSON.
    #[error("invalid JSON in {status} response from Shortcut API: {message}")]
    InvalidResponse {
        status: u16,
        message: String,
        raw: String,
    },
}

impl ApiError {
    pub(crate) fn transport(err: impl std::fmt::Display) -> Self {
        ApiError::Transport {
            message: err.to_string(),
        }
    }

    /// Structured details for the failure, when the upstream sent a body.
    ///
    /// JSON error bodies are returned as parsed; anything else is wrapped as
    /// `{"rawResponse": text}`. Configuration and transport errors have none.
    pub fn details(&self) -> Option<Value> {
        match self {
            ApiError::Api { details, .. } => Some(details.clone()),
            ApiError::InvalidResponse { raw, .. } => Some(raw_response(raw)),
            _ => None,
        }
    }

    /// HTTP status of the upstream response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } | ApiError::InvalidResponse { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// True for failures detected before any request left the process.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ApiError::UnsupportedMethod(_)
                | ApiError::InvalidUrl { .. }
                | ApiError::Serialization(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Wrap a non-JSON body the way every failure reports it.
pub fn raw_response(text: &str) -> Value {
    json!({ "rawResponse": text })
}
