use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, Comment, Epic, Member, Story, Workflow};
use serde_json::{json, Value};
use tower::ServiceExt;

const TOKEN: &str = "test-token";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(format!("/api/v3{uri}"))
        .header("Shortcut-Token", TOKEN)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(format!("/api/v3{uri}"))
        .header(http::header::CONTENT_TYPE, "application/json")
        .header("Shortcut-Token", TOKEN)
        .body(body.to_string())
        .unwrap()
}

async fn create_story(app: &Router, body: &str) -> Story {
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/stories", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

// --- auth ---

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let resp = app(TOKEN)
        .oneshot(
            Request::builder()
                .uri("/api/v3/stories")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"message": "Unauthorized"}));
}

#[tokio::test]
async fn wrong_token_is_unauthorized() {
    let resp = app("other-token")
        .oneshot(request("GET", "/projects"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- stories ---

#[tokio::test]
async fn list_stories_empty() {
    let resp = app(TOKEN).oneshot(request("GET", "/stories")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let stories: Vec<Story> = body_json(resp).await;
    assert!(stories.is_empty());
}

#[tokio::test]
async fn create_story_applies_defaults() {
    let app = app(TOKEN);
    let story = create_story(&app, r#"{"name":"Login bug"}"#).await;

    assert_eq!(story.name, "Login bug");
    assert_eq!(story.story_type, "feature");
    assert_eq!(story.workflow_state_id, 500000006);
    assert!(story.app_url.ends_with(&story.id.to_string()));
}

#[tokio::test]
async fn create_story_with_labels_assigns_label_ids() {
    let app = app(TOKEN);
    let story = create_story(
        &app,
        r#"{"name":"Tagged","labels":[{"name":"backend"},{"name":"urgent"}]}"#,
    )
    .await;

    assert_eq!(story.labels.len(), 2);
    assert_eq!(story.label_ids.len(), 2);
    assert_eq!(story.labels[1].name, "urgent");
}

#[tokio::test]
async fn create_story_invalid_type_returns_400_json() {
    let resp = app(TOKEN)
        .oneshot(json_request(
            "POST",
            "/stories",
            r#"{"name":"x","story_type":"epic"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert!(body["errors"]["story_type"].is_string());
}

#[tokio::test]
async fn create_story_unknown_state_returns_422() {
    let resp = app(TOKEN)
        .oneshot(json_request(
            "POST",
            "/stories",
            r#"{"name":"x","workflow_state_id":1}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn list_stories_filters_by_state_and_owner() {
    let app = app(TOKEN);
    create_story(&app, r#"{"name":"a","workflow_state_id":500000007}"#).await;
    create_story(
        &app,
        r#"{"name":"b","workflow_state_id":500000007,"owner_ids":["u-1"]}"#,
    )
    .await;
    create_story(&app, r#"{"name":"c"}"#).await;

    let resp = app
        .clone()
        .oneshot(request("GET", "/stories?workflow_state_id=500000007"))
        .await
        .unwrap();
    let stories: Vec<Story> = body_json(resp).await;
    assert_eq!(stories.len(), 2);

    let resp = app
        .oneshot(request("GET", "/stories?owner_ids%5B%5D=u-1"))
        .await
        .unwrap();
    let stories: Vec<Story> = body_json(resp).await;
    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].name, "b");
}

#[tokio::test]
async fn get_story_not_found_returns_json_404() {
    let resp = app(TOKEN)
        .oneshot(request("GET", "/stories/404"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"message": "not found"}));
}

#[tokio::test]
async fn update_story_changes_only_given_fields() {
    let app = app(TOKEN);
    let story = create_story(&app, r#"{"name":"Old","description":"keep"}"#).await;

    let resp = app
        .oneshot(json_request(
            "PUT",
            &format!("/stories/{}", story.id),
            r#"{"name":"New","workflow_state_id":500000008}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Story = body_json(resp).await;
    assert_eq!(updated.name, "New");
    assert_eq!(updated.description, "keep");
    assert_eq!(updated.workflow_state_id, 500000008);
}

#[tokio::test]
async fn delete_story_returns_204_then_404() {
    let app = app(TOKEN);
    let story = create_story(&app, r#"{"name":"Doomed"}"#).await;
    let uri = format!("/stories/{}", story.id);

    let resp = app.clone().oneshot(request("DELETE", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = app.oneshot(request("DELETE", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_is_attached_to_story() {
    let app = app(TOKEN);
    let story = create_story(&app, r#"{"name":"Discuss"}"#).await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/stories/{}/comments", story.id),
            r#"{"text":"looks good"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let comment: Comment = body_json(resp).await;
    assert_eq!(comment.text, "looks good");
    assert!(comment.author_id.is_some());

    let resp = app
        .oneshot(request("GET", &format!("/stories/{}", story.id)))
        .await
        .unwrap();
    let fetched: Story = body_json(resp).await;
    assert_eq!(fetched.comments.len(), 1);
}

#[tokio::test]
async fn comment_on_missing_story_returns_404() {
    let resp = app(TOKEN)
        .oneshot(json_request("POST", "/stories/77/comments", r#"{"text":"x"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- search ---

#[tokio::test]
async fn search_matches_name_or_description_and_pages() {
    let app = app(TOKEN);
    create_story(&app, r#"{"name":"Login bug"}"#).await;
    create_story(&app, r#"{"name":"Other","description":"breaks LOGIN page"}"#).await;
    create_story(&app, r#"{"name":"Unrelated"}"#).await;

    let resp = app
        .oneshot(request("GET", "/search/stories?query=login&page_size=1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert!(body["next"].is_null());
}

// --- epics ---

#[tokio::test]
async fn epic_lifecycle() {
    let app = app(TOKEN);

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/epics",
            r#"{"name":"Q3 auth","project_ids":[10]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let epic: Epic = body_json(resp).await;
    assert_eq!(epic.state, "to do");

    let uri = format!("/epics/{}", epic.id);
    let resp = app
        .clone()
        .oneshot(json_request("PUT", &uri, r#"{"state":"in progress"}"#))
        .await
        .unwrap();
    let updated: Epic = body_json(resp).await;
    assert_eq!(updated.state, "in progress");
    assert_eq!(updated.name, "Q3 auth");

    let resp = app.clone().oneshot(request("GET", "/epics")).await.unwrap();
    let epics: Vec<Epic> = body_json(resp).await;
    assert_eq!(epics.len(), 1);

    let resp = app.clone().oneshot(request("DELETE", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.oneshot(request("GET", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_epic_rejects_unknown_state() {
    let app = app(TOKEN);
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/epics", r#"{"name":"e"}"#))
        .await
        .unwrap();
    let epic: Epic = body_json(resp).await;

    let resp = app
        .oneshot(json_request(
            "PUT",
            &format!("/epics/{}", epic.id),
            r#"{"state":"blocked"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- workspace ---

#[tokio::test]
async fn workflows_are_seeded() {
    let resp = app(TOKEN).oneshot(request("GET", "/workflows")).await.unwrap();
    let workflows: Vec<Workflow> = body_json(resp).await;
    assert_eq!(workflows.len(), 1);
    assert_eq!(workflows[0].states.len(), 3);
}

#[tokio::test]
async fn members_carry_profile() {
    let resp = app(TOKEN).oneshot(request("GET", "/members")).await.unwrap();
    let members: Vec<Member> = body_json(resp).await;
    assert_eq!(members[0].profile.mention_name, "ada");
}

#[tokio::test]
async fn projects_include_archived_flag() {
    let resp = app(TOKEN).oneshot(request("GET", "/projects")).await.unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body[1]["archived"], true);
}

// --- stub routes ---

#[tokio::test]
async fn echo_reflects_request() {
    let resp = app(TOKEN)
        .oneshot(json_request("POST", "/_stub/echo?a=1", r#"{"x":1}"#))
        .await
        .unwrap();

    let body: Value = body_json(resp).await;
    assert_eq!(body["method"], "POST");
    assert_eq!(body["query"], "a=1");
    assert_eq!(body["content_type"], "application/json");
    assert_eq!(body["token"], TOKEN);
    assert_eq!(body["body"], r#"{"x":1}"#);
}

#[tokio::test]
async fn plain_error_is_not_json() {
    let resp = app(TOKEN)
        .oneshot(request("GET", "/_stub/plain-error"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(&body_bytes(resp).await[..], b"oops");
}

#[tokio::test]
async fn malformed_claims_json() {
    let resp = app(TOKEN)
        .oneshot(request("GET", "/_stub/malformed"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[http::header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(&body_bytes(resp).await[..], b"not json");
}

#[tokio::test]
async fn large_is_a_json_array_of_at_least_the_requested_size() {
    let resp = app(TOKEN)
        .oneshot(request("GET", "/_stub/large?bytes=4096"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert!(bytes.len() >= 4096);
    let items: Vec<String> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(items.len(), 5);
}

#[tokio::test]
async fn invalid_utf8_error_keeps_raw_bytes() {
    let resp = app(TOKEN)
        .oneshot(request("GET", "/_stub/invalid-utf8"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(&body_bytes(resp).await[..], b"oops \xff\xfe");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app(TOKEN)
        .oneshot(request("GET", "/nonexistent"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
