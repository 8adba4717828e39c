//! Read-only story resources.
//!
//! `shortcut://stories` lists story summaries and accepts `workflow_state_id`,
//! `project_id` and `limit` query parameters. `shortcut://story/{story_id}`
//! reads one story in full. Both are served by the same handlers as the
//! `list_stories` and `get_story_details` tools.

use rmcp::model::{AnnotateAble, RawResource, RawResourceTemplate, Resource, ResourceTemplate};
use shortcut_core::AsyncClient;
use thiserror::Error;
use url::Url;

use crate::handlers::{self, ToolResult};
use crate::params::{ListStoriesParams, StoryIdParams};

pub const STORIES_URI: &str = "shortcut://stories";
pub const STORY_URI_TEMPLATE: &str = "shortcut://story/{story_id}";

/// Stories returned by `shortcut://stories` when no `limit` is given.
pub const DEFAULT_RESOURCE_LIMIT: usize = 20;

const JSON_MIME: &str = "application/json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("unknown resource: {0}")]
    Unknown(String),

    #[error("invalid {name} in {uri}: {value:?}")]
    InvalidParam {
        uri: String,
        name: String,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryResource {
    Stories {
        workflow_state_id: Option<i64>,
        project_id: Option<i64>,
        limit: usize,
    },
    Story(i64),
}

impl StoryResource {
    pub fn parse(uri: &str) -> Result<Self, ResourceError> {
        let unknown = || ResourceError::Unknown(uri.to_string());
        let url = Url::parse(uri).map_err(|_| unknown())?;
        if url.scheme() != "shortcut" {
            return Err(unknown());
        }

        let invalid = |name: &str, value: &str| ResourceError::InvalidParam {
            uri: uri.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        };

        match url.host_str() {
            Some("stories") if url.path().trim_matches('/').is_empty() => {
                let mut workflow_state_id = None;
                let mut project_id = None;
                let mut limit = DEFAULT_RESOURCE_LIMIT;
                for (name, value) in url.query_pairs() {
                    match &*name {
                        "workflow_state_id" => {
                            workflow_state_id =
                                Some(value.parse().map_err(|_| invalid(&name, &value))?)
                        }
                        "project_id" => {
                            project_id = Some(value.parse().map_err(|_| invalid(&name, &value))?)
                        }
                        "limit" => limit = value.parse().map_err(|_| invalid(&name, &value))?,
                        _ => {}
                    }
                }
                Ok(StoryResource::Stories {
                    workflow_state_id,
                    project_id,
                    limit,
                })
            }
            Some("story") => {
                let id = url.path().trim_matches('/');
                if id.is_empty() || id.contains('/') {
                    return Err(unknown());
                }
                id.parse()
                    .map(StoryResource::Story)
                    .map_err(|_| invalid("story_id", id))
            }
            _ => Err(unknown()),
        }
    }
}

/// Fetch a resource and render it the same way the matching tool does.
pub async fn read(client: &AsyncClient, resource: StoryResource) -> ToolResult {
    match resource {
        StoryResource::Stories {
            workflow_state_id,
            project_id,
            limit,
        } => {
            let params = ListStoriesParams {
                workflow_state_id,
                project_id,
                owner_id: None,
                limit: Some(limit),
            };
            handlers::list_stories(client, params).await
        }
        StoryResource::Story(story_id) => {
            handlers::get_story_details(client, StoryIdParams { story_id }).await
        }
    }
}

pub fn list() -> Vec<Resource> {
    vec![RawResource::new(STORIES_URI, "stories")
        .with_description(
            "Story summaries. Optional query parameters: workflow_state_id, project_id, limit (default 20, 0 for all).",
        )
        .with_mime_type(JSON_MIME)
        .no_annotation()]
}

pub fn templates() -> Vec<ResourceTemplate> {
    vec![RawResourceTemplate::new(STORY_URI_TEMPLATE, "story")
        .with_description("One story with its description, owners, labels, comments and links.")
        .with_mime_type(JSON_MIME)
        .no_annotation()]
}
