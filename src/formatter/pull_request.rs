use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;

use super::issue::{DETAIL_COMMENT_LIMIT, comment_summaries};
use crate::github::rest_types::{RestComment, RestCommit, RestPullRequest, RestPullRequestFile};

#[derive(Serialize)]
struct PullRequestSummary<'a> {
    title: &'a str,
    number: u64,
    commits: String,
    comments: String,
}

#[derive(Serialize)]
struct CommitSummary<'a> {
    message: &'a str,
}

pub fn pull_request_list_report(pull_requests: &[RestPullRequest]) -> Result<String> {
    if pull_requests.is_empty() {
        return Ok("No open pull requests available".to_string());
    }

    let summaries: Vec<PullRequestSummary> = pull_requests
        .iter()
        .map(|pr| PullRequestSummary {
            title: &pr.title,
            number: pr.number,
            commits: pr.commits.to_string(),
            comments: pr.comments.to_string(),
        })
        .collect();

    let listing =
        serde_json::to_string(&summaries).context("Failed to serialize pull requests")?;
    Ok(format!(
        "Found {} pull requests:\n{}",
        summaries.len(),
        listing
    ))
}

/// JSON object for the `get_pull_request` mode.
///
/// `comments` and `commits` are omitted when they could not be fetched.
pub fn pull_request_detail_json(
    pull_request: &RestPullRequest,
    comments: Option<&[RestComment]>,
    commits: Option<&[RestCommit]>,
) -> Result<String> {
    let mut detail = json!({
        "title": pull_request.title,
        "number": pull_request.number.to_string(),
        "body": pull_request.body.as_deref().unwrap_or_default(),
    });

    if let Some(comments) = comments {
        detail["comments"] = serde_json::to_string(&comment_summaries(comments))
            .context("Failed to serialize pull request comments")?
            .into();
    }

    if let Some(commits) = commits {
        let summaries: Vec<CommitSummary> = commits
            .iter()
            .take(DETAIL_COMMENT_LIMIT)
            .map(|c| CommitSummary {
                message: &c.commit.message,
            })
            .collect();
        detail["commits"] = serde_json::to_string(&summaries)
            .context("Failed to serialize pull request commits")?
            .into();
    }

    serde_json::to_string(&detail).context("Failed to serialize pull request")
}

pub fn pull_request_files_report(number: u64, files: &[RestPullRequestFile]) -> String {
    let mut content = format!("Files in Pull Request #{}:\n\n", number);

    if files.is_empty() {
        content.push_str("No files changed.\n");
        return content;
    }

    for file in files {
        content.push_str(&format!("File: {}\n", file.filename));
        content.push_str(&format!("Status: {}\n", file.status));
        content.push_str(&format!(
            "Additions: {}, Deletions: {}, Changes: {}\n",
            file.additions, file.deletions, file.changes
        ));
        if let Some(patch) = file.patch.as_deref().filter(|p| !p.is_empty()) {
            content.push_str("Patch:\n");
            content.push_str(patch);
            content.push('\n');
        }
        content.push_str("---\n\n");
    }

    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_request_list_counts_as_strings() {
        let prs: Vec<RestPullRequest> = serde_json::from_value(json!([
            {"number": 3, "title": "Add docs", "commits": 2, "comments": 1}
        ]))
        .unwrap();
        let report = pull_request_list_report(&prs).unwrap();
        assert_eq!(
            report,
            "Found 1 pull requests:\n[{\"title\":\"Add docs\",\"number\":3,\"commits\":\"2\",\"comments\":\"1\"}]"
        );
        assert_eq!(
            pull_request_list_report(&[]).unwrap(),
            "No open pull requests available"
        );
    }

    #[test]
    fn test_detail_omits_unfetched_sections() {
        let pr: RestPullRequest =
            serde_json::from_value(json!({"number": 9, "title": "Fix", "body": "details"})).unwrap();
        let detail = pull_request_detail_json(&pr, None, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&detail).unwrap();
        assert_eq!(value["number"], "9");
        assert!(value.get("comments").is_none());
        assert!(value.get("commits").is_none());

        let commits: Vec<RestCommit> =
            serde_json::from_value(json!([{"commit": {"message": "initial"}}])).unwrap();
        let no_comments: Vec<RestComment> = Vec::new();
        let detail =
            pull_request_detail_json(&pr, Some(no_comments.as_slice()), Some(commits.as_slice()))
                .unwrap();
        let value: serde_json::Value = serde_json::from_str(&detail).unwrap();
        assert_eq!(value["comments"], "[]");
        assert_eq!(value["commits"], r#"[{"message":"initial"}]"#);
    }

    #[test]
    fn test_files_report() {
        let files: Vec<RestPullRequestFile> = serde_json::from_value(json!([
            {"filename": "src/lib.rs", "status": "modified", "additions": 3, "deletions": 1, "changes": 4, "patch": "@@ -1 +1 @@"}
        ]))
        .unwrap();
        let report = pull_request_files_report(12, &files);
        assert!(report.starts_with("Files in Pull Request #12:\n\nFile: src/lib.rs\nStatus: modified\n"));
        assert!(report.contains("Additions: 3, Deletions: 1, Changes: 4\nPatch:\n@@ -1 +1 @@\n---"));
    }
}
