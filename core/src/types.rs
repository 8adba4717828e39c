//! Shortcut request payloads and display shapes.
//!
//! # Design
//! Request payloads serialize only the fields the caller set, so an update
//! never clears a field by omission. Display shapes deserialize from the raw
//! API objects and ignore every field they do not name; they are what tool
//! callers see.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Story kind. The only accepted values are `feature`, `bug` and `chore`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    #[default]
    Feature,
    Bug,
    Chore,
}

impl StoryType {
    pub const ALL: [StoryType; 3] = [StoryType::Feature, StoryType::Bug, StoryType::Chore];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoryType::Feature => "feature",
            StoryType::Bug => "bug",
            StoryType::Chore => "chore",
        }
    }
}

impl fmt::Display for StoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!("invalid story type '{s}' (expected one of: feature, bug, chore)")
            })
    }
}

/// Epic progress state as accepted by the v3 API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpicState {
    #[serde(rename = "to do")]
    ToDo,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl EpicState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EpicState::ToDo => "to do",
            EpicState::InProgress => "in progress",
            EpicState::Done => "done",
        }
    }
}

impl FromStr for EpicState {
    type Err = String;

    /// Accepts `to do`, `to_do` and `todo` style spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "todo" => Ok(EpicState::ToDo),
            "inprogress" => Ok(EpicState::InProgress),
            "done" => Ok(EpicState::Done),
            _ => Err(format!(
                "invalid epic state '{s}' (expected one of: to do, in progress, done)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRef {
    pub name: String,
}

/// Body of `POST /stories`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateStory {
    pub name: String,
    pub description: String,
    pub story_type: StoryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epic_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_state_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelRef>,
}

/// Body of `PUT /stories/{id}`. Only the fields present are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_type: Option<StoryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_state_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epic_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_ids: Option<Vec<String>>,
}

impl UpdateStory {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.story_type.is_none()
            && self.workflow_state_id.is_none()
            && self.epic_id.is_none()
            && self.owner_ids.is_none()
    }
}

/// Body of `POST /epics`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEpic {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_ids: Vec<i64>,
}

/// Body of `PUT /epics/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEpic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<EpicState>,
}

impl UpdateEpic {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.state.is_none()
    }
}

/// Filters for `GET /stories`.
#[derive(Debug, Clone, Default)]
pub struct StoryFilter {
    pub workflow_state_id: Option<i64>,
    pub project_id: Option<i64>,
    pub owner_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Display shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorySummary {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub story_type: Option<StoryType>,
    #[serde(default)]
    pub workflow_state_id: Option<i64>,
    #[serde(default)]
    pub workflow_state_name: Option<String>,
    #[serde(default)]
    pub estimate: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryDetail {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub story_type: Option<StoryType>,
    #[serde(default)]
    pub workflow_state_id: Option<i64>,
    #[serde(default)]
    pub workflow_state_name: Option<String>,
    #[serde(default)]
    pub estimate: Option<i64>,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub epic_id: Option<i64>,
    #[serde(default)]
    pub owner_ids: Vec<String>,
    #[serde(default)]
    pub label_ids: Vec<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub comments: Vec<Value>,
    #[serde(default)]
    pub external_links: Vec<String>,
    #[serde(default)]
    pub app_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpicSummary {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub project_ids: Vec<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub app_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: Option<i64>,
    pub text: String,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// One state of one workflow, flattened for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub state_type: String,
    pub workflow_id: i64,
    pub workflow_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: Option<String>,
    pub mention_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub disabled: bool,
}

/// Uniform failure shape rendered to tool callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Acknowledgement for writes whose result is a message plus optional data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl SuccessEnvelope {
    pub fn new(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}
