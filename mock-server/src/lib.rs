//! In-memory stand-in for the Shortcut v3 REST API.
//!
//! Serves the subset of endpoints the adapter calls, under `/api/v3`, and
//! rejects requests without the expected `Shortcut-Token`. A handful of
//! `/_stub/*` routes produce responses the real API rarely does (plain-text
//! or non-UTF-8 errors, malformed or very large JSON, slow replies, an echo
//! of the request) so clients can be tested against them over real HTTP.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    extract::{OriginalUri, Path, Query, Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const API_PREFIX: &str = "/api/v3";
pub const TOKEN_HEADER: &str = "shortcut-token";
pub const DEFAULT_TOKEN: &str = "mock-token";

const STORY_TYPES: [&str; 3] = ["feature", "bug", "chore"];
const EPIC_STATES: [&str; 3] = ["to do", "in progress", "done"];

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Label {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub story_id: i64,
    pub text: String,
    pub author_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Story {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub story_type: String,
    pub workflow_state_id: i64,
    pub project_id: Option<i64>,
    pub epic_id: Option<i64>,
    pub owner_ids: Vec<String>,
    pub label_ids: Vec<i64>,
    pub labels: Vec<Label>,
    pub comments: Vec<Comment>,
    pub estimate: Option<i64>,
    pub deadline: Option<String>,
    pub external_links: Vec<String>,
    pub app_url: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Epic {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub state: String,
    pub project_ids: Vec<i64>,
    pub app_url: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowStateModel {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub state_type: String,
    pub position: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Workflow {
    pub id: i64,
    pub name: String,
    pub default_state_id: i64,
    pub states: Vec<WorkflowStateModel>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub archived: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub mention_name: String,
    pub email_address: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub role: String,
    pub disabled: bool,
    pub profile: Profile,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LabelInput {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateStory {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_story_type")]
    pub story_type: String,
    pub workflow_state_id: Option<i64>,
    pub project_id: Option<i64>,
    pub epic_id: Option<i64>,
    #[serde(default)]
    pub owner_ids: Vec<String>,
    #[serde(default)]
    pub labels: Vec<LabelInput>,
}

fn default_story_type() -> String {
    "feature".to_string()
}

#[derive(Debug, Deserialize)]
pub struct UpdateStory {
    pub name: Option<String>,
    pub description: Option<String>,
    pub story_type: Option<String>,
    pub workflow_state_id: Option<i64>,
    pub epic_id: Option<i64>,
    pub owner_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateEpic {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEpic {
    pub name: Option<String>,
    pub description: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListStoriesQuery {
    pub workflow_state_id: Option<i64>,
    pub project_id: Option<i64>,
    #[serde(rename = "owner_ids[]")]
    pub owner_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    25
}

#[derive(Debug, Deserialize)]
pub struct SlowQuery {
    #[serde(default)]
    pub ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct LargeQuery {
    pub bytes: usize,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Store {
    next_id: i64,
    pub stories: BTreeMap<i64, Story>,
    pub epics: BTreeMap<i64, Epic>,
    pub workflows: Vec<Workflow>,
    pub projects: Vec<Project>,
    pub members: Vec<Member>,
}

impl Store {
    /// One workflow with three states, two projects and one member.
    pub fn seeded() -> Self {
        let state = |id, name: &str, state_type: &str, position| WorkflowStateModel {
            id,
            name: name.to_string(),
            state_type: state_type.to_string(),
            position,
        };
        Self {
            next_id: 1,
            stories: BTreeMap::new(),
            epics: BTreeMap::new(),
            workflows: vec![Workflow {
                id: 500000005,
                name: "Engineering".to_string(),
                default_state_id: 500000006,
                states: vec![
                    state(500000006, "Unstarted", "unstarted", 1),
                    state(500000007, "In Progress", "started", 2),
                    state(500000008, "Done", "done", 3),
                ],
            }],
            projects: vec![
                Project {
                    id: 10,
                    name: "Backend".to_string(),
                    description: Some("Services and APIs".to_string()),
                    archived: false,
                },
                Project {
                    id: 11,
                    name: "Legacy".to_string(),
                    description: None,
                    archived: true,
                },
            ],
            members: vec![Member {
                id: "12345678-9012-3456-7890-123456789012".to_string(),
                role: "admin".to_string(),
                disabled: false,
                profile: Profile {
                    name: "Ada Lovelace".to_string(),
                    mention_name: "ada".to_string(),
                    email_address: "ada@example.com".to_string(),
                },
            }],
        }
    }

    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn default_state_id(&self) -> i64 {
        self.workflows.first().map(|w| w.default_state_id).unwrap_or(0)
    }

    fn state_exists(&self, id: i64) -> bool {
        self.workflows
            .iter()
            .any(|w| w.states.iter().any(|s| s.id == id))
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    token: Arc<str>,
}

pub fn app(token: &str) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::seeded())),
        token: Arc::from(token),
    };
    let api = Router::new()
        .route("/stories", get(list_stories).post(create_story))
        .route(
            "/stories/{id}",
            get(get_story).put(update_story).delete(delete_story),
        )
        .route("/stories/{id}/comments", post(create_comment))
        .route("/search/stories", get(search_stories))
        .route("/epics", get(list_epics).post(create_epic))
        .route(
            "/epics/{id}",
            get(get_epic).put(update_epic).delete(delete_epic),
        )
        .route("/workflows", get(list_workflows))
        .route("/projects", get(list_projects))
        .route("/members", get(list_members))
        .route("/_stub/echo", any(echo))
        .route("/_stub/plain-error", get(plain_error))
        .route("/_stub/malformed", get(malformed))
        .route("/_stub/slow", get(slow))
        .route("/_stub/large", get(large))
        .route("/_stub/invalid-utf8", get(invalid_utf8))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state);
    Router::new().nest(API_PREFIX, api)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

fn api_error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "message": message })))
}

fn not_found() -> (StatusCode, Json<Value>) {
    api_error(StatusCode::NOT_FOUND, "not found")
}

fn invalid(field: &str, value: &str, allowed: &[&str]) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "message": "The request included invalid parameters",
            "errors": { field: format!("'{value}' is not one of {allowed:?}") },
        })),
    )
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let supplied = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if supplied != Some(&*state.token) {
        return api_error(StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    next.run(request).await
}

// ---------------------------------------------------------------------------
// Stories
// ---------------------------------------------------------------------------

async fn list_stories(
    State(state): State<AppState>,
    Query(filter): Query<ListStoriesQuery>,
) -> Json<Vec<Story>> {
    let store = state.db.read().await;
    let stories = store
        .stories
        .values()
        .filter(|s| {
            filter
                .workflow_state_id
                .is_none_or(|id| s.workflow_state_id == id)
        })
        .filter(|s| filter.project_id.is_none_or(|id| s.project_id == Some(id)))
        .filter(|s| {
            filter
                .owner_id
                .as_ref()
                .is_none_or(|owner| s.owner_ids.contains(owner))
        })
        .cloned()
        .collect();
    Json(stories)
}

async fn search_stories(
    State(state): State<AppState>,
    Query(search): Query<SearchQuery>,
) -> Json<Value> {
    let needle = search.query.to_lowercase();
    let store = state.db.read().await;
    let matches: Vec<&Story> = store
        .stories
        .values()
        .filter(|s| {
            s.name.to_lowercase().contains(&needle)
                || s.description.to_lowercase().contains(&needle)
        })
        .collect();
    let total = matches.len();
    let data: Vec<&Story> = matches.into_iter().take(search.page_size).collect();
    Json(json!({ "data": data, "next": null, "total": total }))
}

async fn create_story(
    State(state): State<AppState>,
    Json(input): Json<CreateStory>,
) -> ApiResult<(StatusCode, Json<Story>)> {
    if !STORY_TYPES.contains(&input.story_type.as_str()) {
        return Err(invalid("story_type", &input.story_type, &STORY_TYPES));
    }
    let mut store = state.db.write().await;
    let workflow_state_id = input
        .workflow_state_id
        .unwrap_or_else(|| store.default_state_id());
    if !store.state_exists(workflow_state_id) {
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "workflow_state_id does not exist",
        ));
    }

    let id = store.next_id();
    let labels: Vec<Label> = input
        .labels
        .into_iter()
        .map(|l| Label {
            id: store.next_id(),
            name: l.name,
        })
        .collect();
    let timestamp = now();
    let story = Story {
        id,
        name: input.name,
        description: input.description,
        story_type: input.story_type,
        workflow_state_id,
        project_id: input.project_id,
        epic_id: input.epic_id,
        owner_ids: input.owner_ids,
        label_ids: labels.iter().map(|l| l.id).collect(),
        labels,
        comments: Vec::new(),
        estimate: None,
        deadline: None,
        external_links: Vec::new(),
        app_url: format!("https://app.shortcut.com/mock/story/{id}"),
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    store.stories.insert(id, story.clone());
    Ok((StatusCode::CREATED, Json(story)))
}

async fn get_story(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Story>> {
    let store = state.db.read().await;
    store.stories.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_story(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateStory>,
) -> ApiResult<Json<Story>> {
    if let Some(story_type) = &input.story_type {
        if !STORY_TYPES.contains(&story_type.as_str()) {
            return Err(invalid("story_type", story_type, &STORY_TYPES));
        }
    }
    let mut store = state.db.write().await;
    if let Some(state_id) = input.workflow_state_id {
        if !store.state_exists(state_id) {
            return Err(api_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "workflow_state_id does not exist",
            ));
        }
    }
    let story = store.stories.get_mut(&id).ok_or_else(not_found)?;
    if let Some(name) = input.name {
        story.name = name;
    }
    if let Some(description) = input.description {
        story.description = description;
    }
    if let Some(story_type) = input.story_type {
        story.story_type = story_type;
    }
    if let Some(state_id) = input.workflow_state_id {
        story.workflow_state_id = state_id;
    }
    if let Some(epic_id) = input.epic_id {
        story.epic_id = Some(epic_id);
    }
    if let Some(owner_ids) = input.owner_ids {
        story.owner_ids = owner_ids;
    }
    story.updated_at = now();
    Ok(Json(story.clone()))
}

async fn delete_story(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let mut store = state.db.write().await;
    store
        .stories
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(not_found)
}

async fn create_comment(
    State(state): State<AppState>,
    Path(story_id): Path<i64>,
    Json(input): Json<CreateComment>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let mut store = state.db.write().await;
    if !store.stories.contains_key(&story_id) {
        return Err(not_found());
    }
    let id = store.next_id();
    let author_id = store.members.first().map(|m| m.id.clone());
    let timestamp = now();
    let comment = Comment {
        id,
        story_id,
        text: input.text,
        author_id,
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    let story = store.stories.get_mut(&story_id).ok_or_else(not_found)?;
    story.comments.push(comment.clone());
    Ok((StatusCode::CREATED, Json(comment)))
}

// ---------------------------------------------------------------------------
// Epics
// ---------------------------------------------------------------------------

async fn list_epics(State(state): State<AppState>) -> Json<Vec<Epic>> {
    let store = state.db.read().await;
    Json(store.epics.values().cloned().collect())
}

async fn create_epic(
    State(state): State<AppState>,
    Json(input): Json<CreateEpic>,
) -> (StatusCode, Json<Epic>) {
    let mut store = state.db.write().await;
    let id = store.next_id();
    let timestamp = now();
    let epic = Epic {
        id,
        name: input.name,
        description: input.description,
        state: "to do".to_string(),
        project_ids: input.project_ids,
        app_url: format!("https://app.shortcut.com/mock/epic/{id}"),
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    store.epics.insert(id, epic.clone());
    (StatusCode::CREATED, Json(epic))
}

async fn get_epic(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Epic>> {
    let store = state.db.read().await;
    store.epics.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_epic(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateEpic>,
) -> ApiResult<Json<Epic>> {
    if let Some(epic_state) = &input.state {
        if !EPIC_STATES.contains(&epic_state.as_str()) {
            return Err(invalid("state", epic_state, &EPIC_STATES));
        }
    }
    let mut store = state.db.write().await;
    let epic = store.epics.get_mut(&id).ok_or_else(not_found)?;
    if let Some(name) = input.name {
        epic.name = name;
    }
    if let Some(description) = input.description {
        epic.description = description;
    }
    if let Some(epic_state) = input.state {
        epic.state = epic_state;
    }
    epic.updated_at = now();
    Ok(Json(epic.clone()))
}

async fn delete_epic(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let mut store = state.db.write().await;
    store
        .epics
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(not_found)
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

async fn list_workflows(State(state): State<AppState>) -> Json<Vec<Workflow>> {
    Json(state.db.read().await.workflows.clone())
}

async fn list_projects(State(state): State<AppState>) -> Json<Vec<Project>> {
    Json(state.db.read().await.projects.clone())
}

async fn list_members(State(state): State<AppState>) -> Json<Vec<Member>> {
    Json(state.db.read().await.members.clone())
}

// ---------------------------------------------------------------------------
// Stub-only routes
// ---------------------------------------------------------------------------

/// Reflect what arrived so clients can assert on the wire format.
async fn echo(
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: String,
) -> Json<Value> {
    let value_of = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let body = (!body.is_empty()).then_some(body);
    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "content_type": value_of(header::CONTENT_TYPE.as_str()),
        "token": value_of(TOKEN_HEADER),
        "body": body,
    }))
}

async fn plain_error() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "oops")
}

async fn malformed() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        "not json",
    )
}

async fn slow(Query(q): Query<SlowQuery>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(q.ms)).await;
    Json(json!({ "slept_ms": q.ms }))
}

const LARGE_CHUNK: usize = 1024;

/// A JSON array of 1 KiB strings at least `bytes` long.
async fn large(Query(q): Query<LargeQuery>) -> Json<Vec<String>> {
    let chunk = "x".repeat(LARGE_CHUNK);
    Json(vec![chunk; q.bytes / LARGE_CHUNK + 1])
}

async fn invalid_utf8() -> (StatusCode, &'static [u8]) {
    (StatusCode::INTERNAL_SERVER_ERROR, b"oops \xff\xfe")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_story_defaults_optional_fields() {
        let input: CreateStory = serde_json::from_str(r#"{"name":"Only a name"}"#).unwrap();
        assert_eq!(input.name, "Only a name");
        assert_eq!(input.description, "");
        assert_eq!(input.story_type, "feature");
        assert!(input.labels.is_empty());
    }

    #[test]
    fn create_story_rejects_missing_name() {
        let result: Result<CreateStory, _> = serde_json::from_str(r#"{"description":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_story_all_fields_optional() {
        let input: UpdateStory = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.name.is_none());
        assert!(input.workflow_state_id.is_none());
        assert!(input.owner_ids.is_none());
    }

    #[test]
    fn workflow_state_serializes_type_key() {
        let store = Store::seeded();
        let json = serde_json::to_value(&store.workflows[0].states[0]).unwrap();
        assert_eq!(json["type"], "unstarted");
    }

    #[test]
    fn seeded_store_has_default_state() {
        let store = Store::seeded();
        assert!(store.state_exists(store.default_state_id()));
        assert!(!store.state_exists(1));
    }

    #[test]
    fn ids_are_sequential() {
        let mut store = Store::seeded();
        assert_eq!(store.next_id(), 1);
        assert_eq!(store.next_id(), 2);
    }
}
