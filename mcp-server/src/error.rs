//! Failures a tool call can end in, and how they are shown to the caller.

use shortcut_core::format::{error_envelope, render_error};
use shortcut_core::types::ErrorEnvelope;
use shortcut_core::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Arguments rejected before any request was sent.
    #[error("{0}")]
    InvalidInput(String),

    #[error("unexpected response from Shortcut API: {0}")]
    UnexpectedPayload(#[from] serde_json::Error),

    /// The API answered 204 where a payload was needed.
    #[error("Shortcut API returned no content for {0}")]
    EmptyResponse(String),
}

impl ToolError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ToolError::InvalidInput(message.into())
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            ToolError::Api(err) => ErrorEnvelope::from(err),
            other => error_envelope(other.to_string(), None),
        }
    }

    pub fn render(&self) -> String {
        render_error(&self.envelope())
    }
}
