//! Agent tool and MCP tool server tests against a mock server

use std::sync::{Arc, Mutex};

use mockito::{Matcher, Server};
use serde_json::json;

use github_toolkit::tools::{
    GitHubAgentToolkit, GitHubToolServer, Tool, ToolCallbacks, ToolError, ToolkitOptions,
};
use test_util::{error_body, mock_wrapper, repo_path};

#[derive(Default)]
struct RecordingCallbacks {
    events: Mutex<Vec<String>>,
}

impl RecordingCallbacks {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ToolCallbacks for RecordingCallbacks {
    fn on_tool_start(&self, tool_name: &str, input: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("start:{}:{}", tool_name, input));
    }

    fn on_tool_end(&self, tool_name: &str, _output: &str) {
        self.events.lock().unwrap().push(format!("end:{}", tool_name));
    }

    fn on_tool_error(&self, tool_name: &str, _error: &anyhow::Error) {
        self.events.lock().unwrap().push(format!("error:{}", tool_name));
    }
}

async fn mock_issue_seven(server: &mut mockito::ServerGuard) {
    server
        .mock("GET", repo_path("issues/7").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"number": 7, "title": "Crash", "body": "It crashes"}).to_string())
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", repo_path("issues/7/comments").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;
}

fn toolkit_with(
    server: &mockito::ServerGuard,
    callbacks: Arc<RecordingCallbacks>,
) -> GitHubAgentToolkit {
    GitHubAgentToolkit::with_callbacks(
        Arc::new(mock_wrapper(server, "main", "main")),
        ToolkitOptions::default(),
        callbacks,
    )
}

#[tokio::test]
async fn test_tool_cleans_number_input_and_reports_events() {
    let mut server = Server::new_async().await;
    mock_issue_seven(&mut server).await;

    let callbacks = Arc::new(RecordingCallbacks::default());
    let toolkit = toolkit_with(&server, Arc::clone(&callbacks));
    let tool = toolkit.tool_by_name("Get Issue").unwrap();

    let output = tool.call("  issue #7 ").await.unwrap();
    let detail: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(detail["number"], 7);

    assert_eq!(
        callbacks.events(),
        vec![
            "start:Get Issue:  issue #7 ".to_string(),
            "end:Get Issue".to_string()
        ]
    );
}

#[tokio::test]
async fn test_tool_wraps_hard_failures() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", repo_path("issues/99").as_str())
        .with_status(500)
        .with_body(error_body("Server Error"))
        .create_async()
        .await;

    let callbacks = Arc::new(RecordingCallbacks::default());
    let toolkit = toolkit_with(&server, Arc::clone(&callbacks));
    let tool = toolkit.tool_by_name("Get Issue").unwrap();

    let err = tool.call("99").await.unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("GitHub operation failed:"));
    assert!(message.contains("failed to get issue"));
    assert!(matches!(
        err.downcast_ref::<ToolError>(),
        Some(ToolError::OperationFailed(_))
    ));
    assert_eq!(callbacks.events().last().unwrap(), "error:Get Issue");
}

#[tokio::test]
async fn test_comment_tool_normalises_payload() {
    let mut server = Server::new_async().await;
    let post = server
        .mock("POST", repo_path("issues/42/comments").as_str())
        .match_body(Matcher::Json(json!({"body": "Looks good"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": 1}).to_string())
        .create_async()
        .await;

    let toolkit = GitHubAgentToolkit::from_wrapper(
        Arc::new(mock_wrapper(&server, "main", "main")),
        false,
    );
    let tool = toolkit.tool_by_name("Comment on Issue").unwrap();

    let output = tool.call(" 42 \n   Looks good  ").await.unwrap();
    assert_eq!(output, "Commented on issue 42");
    post.assert_async().await;
}

#[tokio::test]
async fn test_server_resolves_display_and_mode_names() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", repo_path("issues/7").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"number": 7, "title": "Crash"}).to_string())
        .expect(2)
        .create_async()
        .await;
    server
        .mock("GET", repo_path("issues/7/comments").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let toolkit = GitHubAgentToolkit::from_wrapper(
        Arc::new(mock_wrapper(&server, "main", "main")),
        false,
    );
    let tool_server = GitHubToolServer::new(Arc::new(toolkit));

    assert!(tool_server.call_tool("Get Issue", "7").await.is_ok());
    assert!(tool_server.call_tool("get_issue", "7").await.is_ok());
}

#[tokio::test]
async fn test_server_rejects_unknown_and_disabled_tools() {
    let server = Server::new_async().await;
    let toolkit = GitHubAgentToolkit::from_wrapper(
        Arc::new(mock_wrapper(&server, "main", "main")),
        false,
    );
    let tool_server = GitHubToolServer::new(Arc::new(toolkit));

    let err = tool_server.call_tool("Launch rockets", "").await.unwrap_err();
    assert!(matches!(err, ToolError::UnknownTool(ref name) if name == "Launch rockets"));
    assert_eq!(err.to_string(), "Unknown tool: 'Launch rockets'");

    // release tools are only registered on request
    let err = tool_server.call_tool("Get latest release", "").await.unwrap_err();
    assert!(matches!(err, ToolError::UnknownTool(_)));
}

#[tokio::test]
async fn test_server_surfaces_operation_failures() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", repo_path("issues/3").as_str())
        .with_status(404)
        .with_body(error_body("Not Found"))
        .create_async()
        .await;

    let toolkit = GitHubAgentToolkit::from_wrapper(
        Arc::new(mock_wrapper(&server, "main", "main")),
        false,
    );
    let tool_server = GitHubToolServer::new(Arc::new(toolkit));

    let err = tool_server.call_tool("get_issue", "3").await.unwrap_err();
    assert!(matches!(err, ToolError::OperationFailed(_)));
    assert!(String::from(err).contains("Status: 404"));
}
