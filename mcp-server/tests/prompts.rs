//! Report prompts: names, arguments and rendered text.

mod common;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{PromptMessage, PromptMessageContent, PromptMessageRole};
use shortcut_mcp::params::{BugReportParams, FeatureRequestParams};
use shortcut_mcp::ShortcutServer;

use common::server;

fn only_text(messages: &[PromptMessage]) -> &str {
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, PromptMessageRole::User);
    match &messages[0].content {
        PromptMessageContent::Text { text } => text,
        _ => panic!("Expected text content"),
    }
}

#[test]
fn prompts_are_named_and_take_required_arguments() {
    let bug = ShortcutServer::create_bug_report_prompt_attr();
    assert_eq!(bug.name, "create_bug_report");
    let args = bug.arguments.unwrap();
    let names: Vec<&str> = args.iter().map(|a| a.name.as_str()).collect();
    for expected in ["title", "steps", "expected", "actual"] {
        assert!(names.contains(&expected), "{expected}");
    }
    assert!(args.iter().all(|a| a.required == Some(true)));

    let feature = ShortcutServer::create_feature_request_prompt_attr();
    assert_eq!(feature.name, "create_feature_request");
    assert_eq!(feature.arguments.unwrap().len(), 4);
}

#[tokio::test]
async fn bug_report_prompt_renders_markdown() {
    let messages = server()
        .create_bug_report(Parameters(BugReportParams {
            title: "Crash".to_string(),
            steps: "Open app".to_string(),
            expected: "Loads".to_string(),
            actual: "Crashes".to_string(),
        }))
        .await;

    let text = only_text(&messages);
    assert!(text.starts_with("# Crash"));
    assert!(text.contains("Open app"));
    assert!(text.contains("Bug reported on "));
}

#[tokio::test]
async fn feature_request_prompt_renders_markdown() {
    let messages = server()
        .create_feature_request(Parameters(FeatureRequestParams {
            title: "Export".to_string(),
            description: "CSV export".to_string(),
            user_value: "Reporting".to_string(),
            acceptance_criteria: "- downloads a file".to_string(),
        }))
        .await;

    let text = only_text(&messages);
    assert!(text.starts_with("# Export"));
    assert!(text.contains("## User Value\nReporting"));
}
