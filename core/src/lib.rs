//! Request normalization core for the Shortcut REST API.
//!
//! # Overview
//! Every call is described as an `Operation` (method, relative path, query,
//! optional JSON body). `ShortcutClient` turns it into an `HttpRequest` and
//! maps the resulting `HttpResponse` to an `Outcome`: a parsed payload,
//! `None` for HTTP 204, or an `ApiError` carrying message and details.
//!
//! # Design
//! - Host-does-IO: request building and outcome mapping are pure. The
//!   `BlockingClient` (ureq) and `AsyncClient` (reqwest) transports only
//!   execute the round-trip, so both follow identical URL, header and error
//!   rules.
//! - `Config` is built once by the caller and shared read-only.
//! - No retries, caching or pagination. One call, one request.
//! - `endpoints` shapes tool arguments into operations and `format` shapes
//!   payloads for display; neither performs I/O.

pub mod blocking;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod format;
pub mod http;
pub mod nonblocking;
pub mod operation;
pub mod types;

pub use blocking::BlockingClient;
pub use client::{join_url, Outcome, ShortcutClient};
pub use config::{Config, ConfigError, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use nonblocking::AsyncClient;
pub use operation::{Operation, QueryValue};
pub use types::{
    CreateEpic, CreateStory, EpicState, LabelRef, StoryFilter, StoryType, UpdateEpic, UpdateStory,
};
