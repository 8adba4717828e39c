//! One function per tool: validate arguments, run the operation, shape the
//! payload for display.
//!
//! Handlers return the rendered JSON on success. Every failure, whether it
//! came from the API, the network or the arguments, is a `ToolError`; there
//! is no path that turns a failure into an empty result.

use serde_json::Value;
use shortcut_core::format::{self, decode, render};
use shortcut_core::types::{
    Comment, EpicSummary, LabelRef, Project, StoryDetail, StorySummary, SuccessEnvelope,
};
use shortcut_core::{
    endpoints, AsyncClient, CreateEpic, CreateStory, EpicState, Operation, StoryFilter,
    StoryType, UpdateEpic, UpdateStory,
};

use crate::error::ToolError;
use crate::params::{
    AddCommentParams, CreateEpicParams, CreateStoryParams, EpicIdParams, ListEpicsParams,
    ListStoriesParams, SearchStoriesParams, StoryIdParams, UpdateEpicParams, UpdateStoryParams,
};

pub const DEFAULT_LIMIT: usize = 25;

/// Largest `page_size` the search endpoint accepts.
pub const MAX_PAGE_SIZE: usize = 25;

pub type ToolResult = Result<String, ToolError>;

/// `None` means no limit.
pub fn apply_limit(limit: Option<usize>) -> Option<usize> {
    match limit.unwrap_or(DEFAULT_LIMIT) {
        0 => None,
        n => Some(n),
    }
}

fn truncate<T>(items: &mut Vec<T>, limit: Option<usize>) {
    if let Some(n) = limit {
        items.truncate(n);
    }
}

/// Execute an operation that must produce a payload.
async fn fetch(client: &AsyncClient, op: &Operation) -> Result<Value, ToolError> {
    client
        .execute(op)
        .await?
        .ok_or_else(|| ToolError::EmptyResponse(format!("{} {}", op.method(), op.path())))
}

fn non_blank(value: &str, message: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::invalid(message));
    }
    Ok(())
}

fn parse_story_type(value: Option<&str>) -> Result<Option<StoryType>, ToolError> {
    value
        .map(|s| s.parse::<StoryType>().map_err(ToolError::InvalidInput))
        .transpose()
}

// ---------------------------------------------------------------------------
// Stories
// ---------------------------------------------------------------------------

pub async fn list_stories(client: &AsyncClient, params: ListStoriesParams) -> ToolResult {
    let filter = StoryFilter {
        workflow_state_id: params.workflow_state_id,
        project_id: params.project_id,
        owner_id: params.owner_id,
    };
    let payload = fetch(client, &endpoints::list_stories(&filter)).await?;
    let mut stories: Vec<StorySummary> = decode(payload)?;
    truncate(&mut stories, apply_limit(params.limit));
    Ok(render(&stories))
}

pub async fn search_stories(client: &AsyncClient, params: SearchStoriesParams) -> ToolResult {
    non_blank(&params.query, "Search query is required")?;
    let limit = apply_limit(params.limit);
    let page_size = limit.unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE);

    let op = endpoints::search_stories(params.query.trim(), page_size);
    let mut stories: Vec<StorySummary> = format::search_results(fetch(client, &op).await?)?;
    truncate(&mut stories, limit);
    Ok(render(&stories))
}

pub async fn get_story_details(client: &AsyncClient, params: StoryIdParams) -> ToolResult {
    let payload = fetch(client, &endpoints::get_story(params.story_id)).await?;
    let story: StoryDetail = decode(payload)?;
    Ok(render(&story))
}

pub async fn create_story(client: &AsyncClient, params: CreateStoryParams) -> ToolResult {
    non_blank(&params.name, "Story name is required")?;
    let input = CreateStory {
        name: params.name,
        description: params.description,
        story_type: parse_story_type(params.story_type.as_deref())?.unwrap_or_default(),
        project_id: params.project_id,
        epic_id: params.epic_id,
        workflow_state_id: params.workflow_state_id,
        owner_ids: params.owner_ids.unwrap_or_default(),
        labels: params
            .labels
            .unwrap_or_default()
            .into_iter()
            .map(|name| LabelRef { name })
            .collect(),
    };

    let payload = fetch(client, &endpoints::create_story(&input)?).await?;
    let story: StoryDetail = decode(payload)?;
    Ok(render(&story))
}

pub async fn update_story(client: &AsyncClient, params: UpdateStoryParams) -> ToolResult {
    let input = UpdateStory {
        name: params.name,
        description: params.description,
        story_type: parse_story_type(params.story_type.as_deref())?,
        workflow_state_id: params.workflow_state_id,
        epic_id: params.epic_id,
        owner_ids: params.owner_ids,
    };
    if input.is_empty() {
        return Err(ToolError::invalid(format!(
            "No fields to update for story {}",
            params.story_id
        )));
    }

    let payload = fetch(client, &endpoints::update_story(params.story_id, &input)?).await?;
    let story: StoryDetail = decode(payload)?;
    Ok(render(&story))
}

pub async fn delete_story(client: &AsyncClient, params: StoryIdParams) -> ToolResult {
    client
        .execute(&endpoints::delete_story(params.story_id))
        .await?;
    Ok(render(&SuccessEnvelope::new(
        format!("Story {} deleted successfully", params.story_id),
        None,
    )))
}

pub async fn add_comment(client: &AsyncClient, params: AddCommentParams) -> ToolResult {
    non_blank(&params.text, "Comment text is required")?;
    let payload = fetch(client, &endpoints::add_comment(params.story_id, &params.text)).await?;
    let comment: Comment = decode(payload)?;
    Ok(render(&SuccessEnvelope::new(
        "Comment added successfully",
        Some(serde_json::to_value(comment)?),
    )))
}

// ---------------------------------------------------------------------------
// Epics
// ---------------------------------------------------------------------------

pub async fn list_epics(client: &AsyncClient, params: ListEpicsParams) -> ToolResult {
    let payload = fetch(client, &endpoints::list_epics()).await?;
    let mut epics: Vec<EpicSummary> = decode(payload)?;
    truncate(&mut epics, apply_limit(params.limit));
    Ok(render(&epics))
}

pub async fn get_epic(client: &AsyncClient, params: EpicIdParams) -> ToolResult {
    let payload = fetch(client, &endpoints::get_epic(params.epic_id)).await?;
    let epic: EpicSummary = decode(payload)?;
    Ok(render(&epic))
}

pub async fn create_epic(client: &AsyncClient, params: CreateEpicParams) -> ToolResult {
    non_blank(&params.name, "Epic name is required")?;
    let input = CreateEpic {
        name: params.name,
        description: params.description,
        project_ids: params.project_ids.unwrap_or_default(),
    };
    let payload = fetch(client, &endpoints::create_epic(&input)?).await?;
    let epic: EpicSummary = decode(payload)?;
    Ok(render(&epic))
}

pub async fn update_epic(client: &AsyncClient, params: UpdateEpicParams) -> ToolResult {
    let state = params
        .state
        .as_deref()
        .map(|s| s.parse::<EpicState>().map_err(ToolError::InvalidInput))
        .transpose()?;
    let input = UpdateEpic {
        name: params.name,
        description: params.description,
        state,
    };
    if input.is_empty() {
        return Err(ToolError::invalid(format!(
            "No fields to update for epic {}",
            params.epic_id
        )));
    }

    let payload = fetch(client, &endpoints::update_epic(params.epic_id, &input)?).await?;
    let epic: EpicSummary = decode(payload)?;
    Ok(render(&epic))
}

pub async fn delete_epic(client: &AsyncClient, params: EpicIdParams) -> ToolResult {
    client
        .execute(&endpoints::delete_epic(params.epic_id))
        .await?;
    Ok(render(&SuccessEnvelope::new(
        format!("Epic {} deleted successfully", params.epic_id),
        None,
    )))
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

pub async fn list_workflow_states(client: &AsyncClient) -> ToolResult {
    let payload = fetch(client, &endpoints::list_workflows()).await?;
    Ok(render(&format::workflow_states(payload)?))
}

pub async fn list_projects(client: &AsyncClient) -> ToolResult {
    let payload = fetch(client, &endpoints::list_projects()).await?;
    let projects: Vec<Project> = decode(payload)?;
    Ok(render(&projects))
}

pub async fn list_members(client: &AsyncClient) -> ToolResult {
    let payload = fetch(client, &endpoints::list_members()).await?;
    Ok(render(&format::members(payload)?))
}
