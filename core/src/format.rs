//! Raw payload to display shape conversion, and JSON rendering for callers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::types::{ErrorEnvelope, Member, WorkflowState};

/// Decode a payload into a display shape, ignoring fields it does not name.
pub fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(payload)
}

#[derive(Deserialize)]
struct RawWorkflow {
    id: i64,
    name: String,
    #[serde(default)]
    states: Vec<RawWorkflowState>,
}

#[derive(Deserialize)]
struct RawWorkflowState {
    id: i64,
    name: String,
    #[serde(rename = "type")]
    state_type: String,
}

/// Flatten `GET /workflows` into one entry per state, tagged with its workflow.
pub fn workflow_states(payload: Value) -> Result<Vec<WorkflowState>, serde_json::Error> {
    let workflows: Vec<RawWorkflow> = decode(payload)?;
    Ok(workflows
        .into_iter()
        .flat_map(|workflow| {
            let RawWorkflow { id, name, states } = workflow;
            states.into_iter().map(move |state| WorkflowState {
                id: state.id,
                name: state.name,
                state_type: state.state_type,
                workflow_id: id,
                workflow_name: name.clone(),
            })
        })
        .collect())
}

#[derive(Deserialize)]
struct RawMember {
    id: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    profile: RawProfile,
}

#[derive(Default, Deserialize)]
struct RawProfile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    mention_name: Option<String>,
    #[serde(default)]
    email_address: Option<String>,
}

/// Flatten `GET /members`, lifting the nested profile fields.
pub fn members(payload: Value) -> Result<Vec<Member>, serde_json::Error> {
    let raw: Vec<RawMember> = decode(payload)?;
    Ok(raw
        .into_iter()
        .map(|m| Member {
            id: m.id,
            name: m.profile.name,
            mention_name: m.profile.mention_name,
            email: m.profile.email_address,
            role: m.role,
            disabled: m.disabled,
        })
        .collect())
}

#[derive(Deserialize)]
struct SearchEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

/// Extract the `data` array from a search response.
pub fn search_results<T: DeserializeOwned>(payload: Value) -> Result<Vec<T>, serde_json::Error> {
    let envelope: SearchEnvelope<T> = decode(payload)?;
    Ok(envelope.data)
}

/// Build the failure shape shown to tool callers.
pub fn error_envelope(message: impl Into<String>, details: Option<Value>) -> ErrorEnvelope {
    ErrorEnvelope {
        error: message.into(),
        details,
    }
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(err: &ApiError) -> Self {
        error_envelope(err.to_string(), err.details())
    }
}

/// Pretty JSON for a display shape. Encoding failures render as an error
/// envelope rather than a partial payload.
pub fn render<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| render_error(&error_envelope(format!("failed to encode response: {e}"), None)))
}

pub fn render_error(envelope: &ErrorEnvelope) -> String {
    serde_json::to_string_pretty(envelope)
        .unwrap_or_else(|_| format!("{{\"error\": {}}}", Value::String(envelope.error.clone())))
}
