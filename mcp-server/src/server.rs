//! MCP server exposing the Shortcut tools, story resources and report prompts.

use rmcp::{
    handler::server::{
        router::{prompt::PromptRouter, tool::ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolResult, Content, GetPromptRequestParams, GetPromptResult,
        ListPromptsResult, ListResourceTemplatesResult, ListResourcesResult,
        PaginatedRequestParams, PromptMessage, PromptMessageRole, ReadResourceRequestParams,
        ReadResourceResult, ResourceContents, ServerCapabilities, ServerInfo,
    },
    prompt, prompt_handler, prompt_router,
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use serde_json::json;
use shortcut_core::AsyncClient;
use tracing::warn;

use crate::handlers::{self, ToolResult};
use crate::params::{
    AddCommentParams, BugReportParams, CreateEpicParams, CreateStoryParams, EpicIdParams,
    FeatureRequestParams, ListEpicsParams, ListStoriesParams, SearchStoriesParams, StoryIdParams,
    UpdateEpicParams, UpdateStoryParams,
};
use crate::resources::{self, ResourceError, StoryResource};
use crate::templates;

const INSTRUCTIONS: &str = "Shortcut MCP Server - list, search, create and update stories and \
epics, comment on stories, and look up workflow states, projects and members. \
Stories are also readable as shortcut://stories and shortcut://story/{story_id}. \
The create_bug_report and create_feature_request prompts draft story descriptions. \
Failures are returned as {\"error\": ..., \"details\": ...}.";

/// Turn a handler result into a tool result. Failures are flagged as tool
/// errors and carry the error envelope as their text.
fn respond(name: &str, result: ToolResult) -> Result<CallToolResult, McpError> {
    match result {
        Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Err(err) => {
            warn!(tool = name, error = %err, "tool call failed");
            Ok(CallToolResult::error(vec![Content::text(err.render())]))
        }
    }
}

/// One instance per MCP session; clones share the HTTP connection pool.
#[derive(Clone)]
pub struct ShortcutServer {
    client: AsyncClient,
    tool_router: ToolRouter<Self>,
    prompt_router: PromptRouter<Self>,
}

#[tool_router]
impl ShortcutServer {
    pub fn new(client: AsyncClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }

    #[tool(
        description = "List stories, optionally filtered by workflow state, project or owner. Returns story summaries."
    )]
    pub async fn list_stories(
        &self,
        params: Parameters<ListStoriesParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            "list_stories",
            handlers::list_stories(&self.client, params.0).await,
        )
    }

    #[tool(description = "Search stories by text. Returns story summaries.")]
    pub async fn search_stories(
        &self,
        params: Parameters<SearchStoriesParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            "search_stories",
            handlers::search_stories(&self.client, params.0).await,
        )
    }

    #[tool(
        description = "Get one story with its description, owners, labels, comments and links."
    )]
    pub async fn get_story_details(
        &self,
        params: Parameters<StoryIdParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            "get_story_details",
            handlers::get_story_details(&self.client, params.0).await,
        )
    }

    #[tool(
        description = "Create a story. The create_bug_report and create_feature_request prompts draft a description."
    )]
    pub async fn create_story(
        &self,
        params: Parameters<CreateStoryParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            "create_story",
            handlers::create_story(&self.client, params.0).await,
        )
    }

    #[tool(description = "Update fields of an existing story. Only the given fields change.")]
    pub async fn update_story(
        &self,
        params: Parameters<UpdateStoryParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            "update_story",
            handlers::update_story(&self.client, params.0).await,
        )
    }

    #[tool(description = "Delete a story permanently.")]
    pub async fn delete_story(
        &self,
        params: Parameters<StoryIdParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            "delete_story",
            handlers::delete_story(&self.client, params.0).await,
        )
    }

    #[tool(description = "Add a comment to a story.")]
    pub async fn add_comment(
        &self,
        params: Parameters<AddCommentParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            "add_comment",
            handlers::add_comment(&self.client, params.0).await,
        )
    }

    #[tool(description = "List epics in the workspace.")]
    pub async fn list_epics(
        &self,
        params: Parameters<ListEpicsParams>,
    ) -> Result<CallToolResult, McpError> {
        respond("list_epics", handlers::list_epics(&self.client, params.0).await)
    }

    #[tool(description = "Get one epic by ID.")]
    pub async fn get_epic(
        &self,
        params: Parameters<EpicIdParams>,
    ) -> Result<CallToolResult, McpError> {
        respond("get_epic", handlers::get_epic(&self.client, params.0).await)
    }

    #[tool(description = "Create an epic.")]
    pub async fn create_epic(
        &self,
        params: Parameters<CreateEpicParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            "create_epic",
            handlers::create_epic(&self.client, params.0).await,
        )
    }

    #[tool(description = "Rename an epic, change its description, or move it to another state.")]
    pub async fn update_epic(
        &self,
        params: Parameters<UpdateEpicParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            "update_epic",
            handlers::update_epic(&self.client, params.0).await,
        )
    }

    #[tool(description = "Delete an epic. Its stories are kept.")]
    pub async fn delete_epic(
        &self,
        params: Parameters<EpicIdParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            "delete_epic",
            handlers::delete_epic(&self.client, params.0).await,
        )
    }

    #[tool(
        description = "List every workflow state across all workflows, with the workflow it belongs to."
    )]
    pub async fn list_workflow_states(&self) -> Result<CallToolResult, McpError> {
        respond(
            "list_workflow_states",
            handlers::list_workflow_states(&self.client).await,
        )
    }

    #[tool(description = "List projects, including archived ones.")]
    pub async fn list_projects(&self) -> Result<CallToolResult, McpError> {
        respond("list_projects", handlers::list_projects(&self.client).await)
    }

    #[tool(description = "List workspace members with their names and mention handles.")]
    pub async fn list_members(&self) -> Result<CallToolResult, McpError> {
        respond("list_members", handlers::list_members(&self.client).await)
    }
}

#[prompt_router]
impl ShortcutServer {
    #[prompt(
        name = "create_bug_report",
        description = "Draft a Markdown bug report to use as a story description."
    )]
    pub async fn create_bug_report(
        &self,
        params: Parameters<BugReportParams>,
    ) -> Vec<PromptMessage> {
        vec![PromptMessage::new_text(
            PromptMessageRole::User,
            templates::bug_report(&params.0, templates::today()),
        )]
    }

    #[prompt(
        name = "create_feature_request",
        description = "Draft a Markdown feature request to use as a story description."
    )]
    pub async fn create_feature_request(
        &self,
        params: Parameters<FeatureRequestParams>,
    ) -> Vec<PromptMessage> {
        vec![PromptMessage::new_text(
            PromptMessageRole::User,
            templates::feature_request(&params.0, templates::today()),
        )]
    }
}

impl ShortcutServer {
    /// Read `shortcut://stories[?...]` or `shortcut://story/{story_id}`.
    ///
    /// An unknown URI is a protocol error. A failed API call is returned as
    /// the error envelope text, the same body a failed tool call carries.
    pub async fn read_story_resource(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let resource = StoryResource::parse(uri).map_err(|err| match err {
            ResourceError::Unknown(_) => {
                McpError::resource_not_found(err.to_string(), Some(json!({ "uri": uri })))
            }
            ResourceError::InvalidParam { .. } => {
                McpError::invalid_params(err.to_string(), Some(json!({ "uri": uri })))
            }
        })?;

        let text = match resources::read(&self.client, resource).await {
            Ok(text) => text,
            Err(err) => {
                warn!(uri, error = %err, "resource read failed");
                err.render()
            }
        };
        Ok(ReadResourceResult::new(vec![
            ResourceContents::text(text, uri).with_mime_type("application/json")
        ]))
    }
}

#[tool_handler]
#[prompt_handler]
impl ServerHandler for ShortcutServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder()
            .enable_tools()
            .enable_prompts()
            .enable_resources()
            .build();
        info.instructions = Some(INSTRUCTIONS.to_string());
        info
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(resources::list()))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult::with_all_items(
            resources::templates(),
        ))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read_story_resource(&request.uri).await
    }
}
