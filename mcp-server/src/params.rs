//! Tool argument types, with the JSON schema MCP clients see.

use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListStoriesParams {
    #[schemars(description = "Only stories in this workflow state")]
    pub workflow_state_id: Option<i64>,
    #[schemars(description = "Only stories in this project")]
    pub project_id: Option<i64>,
    #[schemars(description = "Only stories owned by this member ID")]
    pub owner_id: Option<String>,
    #[schemars(description = "Maximum number of stories to return (default: 25, 0 for all)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchStoriesParams {
    #[schemars(description = "Search text matched against story names and descriptions")]
    pub query: String,
    #[schemars(description = "Maximum number of stories to return (default: 25)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StoryIdParams {
    #[schemars(description = "Story ID")]
    pub story_id: i64,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct CreateStoryParams {
    #[schemars(description = "Story title")]
    pub name: String,
    #[schemars(description = "Story description (Markdown)")]
    pub description: String,
    #[schemars(description = "One of: feature, bug, chore (default: feature)")]
    pub story_type: Option<String>,
    #[schemars(description = "Project to file the story under")]
    pub project_id: Option<i64>,
    #[schemars(description = "Epic the story belongs to")]
    pub epic_id: Option<i64>,
    #[schemars(description = "Initial workflow state (default: the workflow's first state)")]
    pub workflow_state_id: Option<i64>,
    #[schemars(description = "Member IDs to assign as owners")]
    pub owner_ids: Option<Vec<String>>,
    #[schemars(description = "Label names to attach; unknown labels are created")]
    pub labels: Option<Vec<String>>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct UpdateStoryParams {
    #[schemars(description = "Story ID to update")]
    pub story_id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    #[schemars(description = "One of: feature, bug, chore")]
    pub story_type: Option<String>,
    #[schemars(description = "Move the story to this workflow state")]
    pub workflow_state_id: Option<i64>,
    pub epic_id: Option<i64>,
    #[schemars(description = "Replaces all current owners")]
    pub owner_ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddCommentParams {
    #[schemars(description = "Story to comment on")]
    pub story_id: i64,
    #[schemars(description = "Comment text (Markdown)")]
    pub text: String,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListEpicsParams {
    #[schemars(description = "Maximum number of epics to return (default: 25, 0 for all)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EpicIdParams {
    #[schemars(description = "Epic ID")]
    pub epic_id: i64,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct CreateEpicParams {
    #[schemars(description = "Epic title")]
    pub name: String,
    pub description: Option<String>,
    #[schemars(description = "Projects the epic spans")]
    pub project_ids: Option<Vec<i64>>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct UpdateEpicParams {
    #[schemars(description = "Epic ID to update")]
    pub epic_id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    #[schemars(description = "One of: to do, in progress, done")]
    pub state: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BugReportParams {
    #[schemars(description = "Bug title")]
    pub title: String,
    #[schemars(description = "Steps to reproduce")]
    pub steps: String,
    #[schemars(description = "What should happen")]
    pub expected: String,
    #[schemars(description = "What happens instead")]
    pub actual: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FeatureRequestParams {
    #[schemars(description = "Feature title")]
    pub title: String,
    pub description: String,
    #[schemars(description = "Why users want this")]
    pub user_value: String,
    #[schemars(description = "Conditions for the feature to be considered done")]
    pub acceptance_criteria: String,
}
