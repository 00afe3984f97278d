//! Repository file loader tests against a mock server

use mockito::{Matcher, Server};
use serde_json::json;

use github_toolkit::loaders::{GitHubFileLoader, Loader};
use github_toolkit::types::MetadataValue;
use test_util::{TOKEN, error_body, file_body, file_body_bytes, repo_path};

fn tree_body() -> String {
    json!({
        "sha": "tree-sha",
        "truncated": false,
        "tree": [
            {"path": "README.md", "type": "blob", "sha": "r1"},
            {"path": "src", "type": "tree", "sha": "t1"},
            {"path": "src/lib.rs", "type": "blob", "sha": "l1"},
            {"path": "empty.txt", "type": "blob", "sha": "e1"},
            {"path": "broken.bin", "type": "blob", "sha": "b1"}
        ]
    })
    .to_string()
}

async fn mock_contents(server: &mut mockito::ServerGuard, path: &str, content: &str) {
    server
        .mock("GET", repo_path(&format!("contents/{}", path)).as_str())
        .match_query(Matcher::UrlEncoded("ref".into(), "dev".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(file_body(path, content, "sha"))
        .create_async()
        .await;
}

async fn mock_repository(server: &mut mockito::ServerGuard) {
    server
        .mock("GET", repo_path("git/trees/dev").as_str())
        .match_query(Matcher::UrlEncoded("recursive".into(), "1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tree_body())
        .create_async()
        .await;
    mock_contents(server, "README.md", "# Project\n").await;
    mock_contents(server, "src/lib.rs", "pub fn add() {}\n").await;
    mock_contents(server, "empty.txt", "").await;
    server
        .mock("GET", repo_path("contents/broken.bin").as_str())
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(error_body("Not Found"))
        .create_async()
        .await;
}

fn loader(server: &mockito::ServerGuard) -> GitHubFileLoader {
    GitHubFileLoader::new("owner/repo", Some(TOKEN.to_string()))
        .unwrap()
        .with_api_base_url(server.url())
        .with_branch("dev")
}

#[tokio::test]
async fn test_load_skips_directories_failures_and_empty_files() {
    let mut server = Server::new_async().await;
    mock_repository(&mut server).await;

    let documents = loader(&server).load().await.unwrap();

    let paths: Vec<&str> = documents
        .iter()
        .filter_map(|doc| doc.metadata_value("path").and_then(MetadataValue::as_str))
        .collect();
    assert_eq!(paths, vec!["README.md", "src/lib.rs"]);
    assert_eq!(documents[1].page_content, "pub fn add() {}\n");
    assert_eq!(
        documents[1].metadata_value("source").and_then(MetadataValue::as_str),
        Some(format!("{}/owner/repo/blob/dev/src/lib.rs", server.url()).as_str())
    );
    assert_eq!(
        documents[1].metadata_value("sha").and_then(MetadataValue::as_str),
        Some("l1")
    );
}

#[tokio::test]
async fn test_load_applies_path_filter() {
    let mut server = Server::new_async().await;
    mock_repository(&mut server).await;

    let documents = loader(&server)
        .with_filter(|path| path.ends_with(".rs"))
        .with_concurrency(1)
        .load()
        .await
        .unwrap();

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].page_content, "pub fn add() {}\n");
}

#[tokio::test]
async fn test_malformed_tree_is_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", repo_path("git/trees/dev").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"sha": "tree-sha"}).to_string())
        .create_async()
        .await;

    let err = loader(&server).load().await.unwrap_err();
    assert!(err.to_string().starts_with("invalid tree response format"));
}

#[tokio::test]
async fn test_missing_branch_is_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", repo_path("git/trees/dev").as_str())
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(error_body("Not Found"))
        .create_async()
        .await;

    let err = loader(&server).load().await.unwrap_err();
    assert_eq!(err.to_string(), "failed to fetch file tree");
}

#[tokio::test]
async fn test_binary_file_is_loaded_lossily() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", repo_path("git/trees/dev").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"sha": "t", "tree": [{"path": "logo.bin", "type": "blob", "sha": "b2"}]})
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", repo_path("contents/logo.bin").as_str())
        .match_query(Matcher::UrlEncoded("ref".into(), "dev".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(file_body_bytes("logo.bin", &[0x68, 0x69, 0xff], "b2"))
        .create_async()
        .await;

    let documents = loader(&server).load().await.unwrap();

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].page_content, "hi\u{FFFD}");
    assert_eq!(
        documents[0].metadata_value("path").and_then(MetadataValue::as_str),
        Some("logo.bin")
    );
}
