//! Serde shapes for the subset of GitHub REST payloads this crate reads and writes.
//!
//! Only the fields the crate consumes are declared; everything else in the
//! API responses is ignored during deserialization.

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RestUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RestLabel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RestMilestone {
    #[serde(default)]
    pub title: String,
    pub number: Option<u64>,
}

/// Issue as returned by the issues and search endpoints.
///
/// Pull requests also come back from the issues endpoints; they are
/// distinguished by the presence of the `pull_request` object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestIssue {
    #[serde(default)]
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub body: Option<String>,
    #[serde(default)]
    pub state: String,
    pub html_url: Option<String>,
    pub user: Option<RestUser>,
    #[serde(default)]
    pub labels: Vec<RestLabel>,
    pub assignee: Option<RestUser>,
    pub milestone: Option<RestMilestone>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub comments: u64,
    pub created_at: Option<String>,
    pub pull_request: Option<serde_json::Value>,
}

impl RestIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub fn user_login(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestComment {
    pub body: Option<String>,
    pub user: Option<RestUser>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestPullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub body: Option<String>,
    #[serde(default)]
    pub state: String,
    /// Only populated on single-PR responses
    #[serde(default)]
    pub commits: u64,
    #[serde(default)]
    pub comments: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestCommitDetail {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestCommit {
    pub sha: Option<String>,
    pub commit: RestCommitDetail,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestPullRequestFile {
    pub filename: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub changes: u64,
    pub patch: Option<String>,
}

/// One entry of a contents listing, or a single file with its content.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestContentEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    #[serde(default)]
    pub sha: String,
    pub content: Option<String>,
    pub encoding: Option<String>,
}

impl RestContentEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == "dir"
    }

    /// Decode the base64 payload of a file entry.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry carries no content or the content is not
    /// valid base64.
    pub fn decoded_content(&self) -> Result<String> {
        let raw = self
            .content
            .as_deref()
            .with_context(|| format!("No content returned for `{}`", self.path))?;
        decode_base64_content(raw)
    }
}

/// The contents endpoint answers with an array for directories and an object for files
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RestContents {
    Directory(Vec<RestContentEntry>),
    File(RestContentEntry),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestGitObject {
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestGitRef {
    #[serde(rename = "ref")]
    pub reference: String,
    pub object: RestGitObject,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestTreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestTree {
    pub tree: Vec<RestTreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestBranch {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestRepository {
    pub full_name: Option<String>,
    pub default_branch: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestRelease {
    pub name: Option<String>,
    pub tag_name: String,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestSearchIssues {
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<RestIssue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestCodeHit {
    pub path: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestSearchCode {
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<RestCodeHit>,
}

#[derive(Debug, Serialize)]
pub struct NewComment<'a> {
    pub body: &'a str,
}

#[derive(Debug, Serialize)]
pub struct NewPullRequest<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub head: &'a str,
    pub base: &'a str,
}

#[derive(Debug, Serialize)]
pub struct NewGitRef<'a> {
    #[serde(rename = "ref")]
    pub reference: String,
    pub sha: &'a str,
}

/// Body of a contents create/update/delete call
#[derive(Debug, Serialize)]
pub struct FileCommit<'a> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
}

impl<'a> FileCommit<'a> {
    pub fn create(path: &str, contents: &str, branch: &'a str) -> Self {
        Self {
            message: format!("Create {}", path),
            content: Some(BASE64.encode(contents)),
            branch,
            sha: None,
        }
    }

    pub fn update(path: &str, contents: &str, branch: &'a str, sha: &'a str) -> Self {
        Self {
            message: format!("Update {}", path),
            content: Some(BASE64.encode(contents)),
            branch,
            sha: Some(sha),
        }
    }

    pub fn delete(path: &str, branch: &'a str, sha: &'a str) -> Self {
        Self {
            message: format!("Delete {}", path),
            content: None,
            branch,
            sha: Some(sha),
        }
    }
}

/// Decode GitHub's line-wrapped base64 file payloads
pub fn decode_base64_content(raw: &str) -> Result<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .context("File content is not valid base64")?;
    // binary files come back lossy instead of failing
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wrapped_base64() {
        // "hello world\n" split across lines the way the contents API wraps it
        let decoded = decode_base64_content("aGVsbG8g\nd29ybGQK\n").unwrap();
        assert_eq!(decoded, "hello world\n");
    }

    #[test]
    fn test_decode_non_utf8_is_lossy() {
        // bytes 68 69 ff
        let decoded = decode_base64_content("aGn/").unwrap();
        assert_eq!(decoded, "hi\u{FFFD}");
        assert!(decode_base64_content("not base64!").is_err());
    }

    #[test]
    fn test_contents_directory_or_file() {
        let dir: RestContents = serde_json::from_str(
            r#"[{"type":"file","path":"a.txt","sha":"1"},{"type":"dir","path":"src","sha":"2"}]"#,
        )
        .unwrap();
        assert!(matches!(dir, RestContents::Directory(ref entries) if entries.len() == 2));

        let file: RestContents = serde_json::from_str(
            r#"{"type":"file","path":"a.txt","sha":"1","content":"aGk=","encoding":"base64"}"#,
        )
        .unwrap();
        match file {
            RestContents::File(entry) => assert_eq!(entry.decoded_content().unwrap(), "hi"),
            RestContents::Directory(_) => panic!("expected a file entry"),
        }
    }

    #[test]
    fn test_file_commit_bodies() {
        let create = serde_json::to_value(FileCommit::create("a.txt", "hi", "dev")).unwrap();
        assert_eq!(create["message"], "Create a.txt");
        assert_eq!(create["content"], "aGk=");
        assert!(create.get("sha").is_none());

        let delete = serde_json::to_value(FileCommit::delete("a.txt", "dev", "abc")).unwrap();
        assert_eq!(delete["message"], "Delete a.txt");
        assert_eq!(delete["sha"], "abc");
        assert!(delete.get("content").is_none());
    }

    #[test]
    fn test_issue_pull_request_flag() {
        let issue: RestIssue =
            serde_json::from_str(r#"{"number":1,"title":"t","pull_request":{"url":"x"}}"#).unwrap();
        assert!(issue.is_pull_request());
        assert_eq!(issue.user_login(), "");
    }
}
