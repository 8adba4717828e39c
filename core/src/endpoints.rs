//! One `Operation` builder per Shortcut capability.
//!
//! These are pure: they shape arguments into method, path, query and body and
//! never touch the network.

use serde::Serialize;

use crate::error::ApiError;
use crate::operation::Operation;
use crate::types::{CreateEpic, CreateStory, StoryFilter, UpdateEpic, UpdateStory};

fn json_body<T: Serialize>(op: Operation, input: &T) -> Result<Operation, ApiError> {
    let body = serde_json::to_value(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
    Ok(op.with_body(body))
}

pub fn list_stories(filter: &StoryFilter) -> Operation {
    Operation::get("stories")
        .with_optional_query("workflow_state_id", filter.workflow_state_id)
        .with_optional_query("project_id", filter.project_id)
        .with_optional_query(
            "owner_ids[]",
            filter.owner_id.as_ref().map(|owner| vec![owner.clone()]),
        )
}

pub fn search_stories(query: &str, page_size: usize) -> Operation {
    Operation::get("search/stories")
        .with_query("query", query)
        .with_query("page_size", page_size)
}

pub fn get_story(story_id: i64) -> Operation {
    Operation::get(format!("stories/{story_id}"))
}

pub fn create_story(input: &CreateStory) -> Result<Operation, ApiError> {
    json_body(Operation::post("stories"), input)
}

pub fn update_story(story_id: i64, input: &UpdateStory) -> Result<Operation, ApiError> {
    json_body(Operation::put(format!("stories/{story_id}")), input)
}

pub fn delete_story(story_id: i64) -> Operation {
    Operation::delete(format!("stories/{story_id}"))
}

pub fn add_comment(story_id: i64, text: &str) -> Operation {
    Operation::post(format!("stories/{story_id}/comments"))
        .with_body(serde_json::json!({ "text": text }))
}

pub fn list_epics() -> Operation {
    Operation::get("epics")
}

pub fn get_epic(epic_id: i64) -> Operation {
    Operation::get(format!("epics/{epic_id}"))
}

pub fn create_epic(input: &CreateEpic) -> Result<Operation, ApiError> {
    json_body(Operation::post("epics"), input)
}

pub fn update_epic(epic_id: i64, input: &UpdateEpic) -> Result<Operation, ApiError> {
    json_body(Operation::put(format!("epics/{epic_id}")), input)
}

pub fn delete_epic(epic_id: i64) -> Operation {
    Operation::delete(format!("epics/{epic_id}"))
}

pub fn list_workflows() -> Operation {
    Operation::get("workflows")
}

pub fn list_projects() -> Operation {
    Operation::get("projects")
}

pub fn list_members() -> Operation {
    Operation::get("members")
}
