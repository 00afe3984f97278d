use crate::github::rest_types::{RestIssue, RestTreeEntry};
use crate::types::{Branch, Document, RepositoryId};

/// Convert an issue payload into a document.
///
/// The body becomes the content, or the title when the body is empty. Nested
/// user and milestone objects are flattened to their login / title, and absent
/// fields fall back to `""`, `false` or `0`.
pub fn issue_document(issue: &RestIssue) -> Document {
    let content = match issue.body.as_deref() {
        Some(body) if !body.is_empty() => body.to_string(),
        _ => issue.title.clone(),
    };

    let labels: Vec<String> = issue
        .labels
        .iter()
        .filter(|label| !label.name.is_empty())
        .map(|label| label.name.clone())
        .collect();

    Document::new(content)
        .with_metadata("url", issue.html_url.clone().unwrap_or_default())
        .with_metadata("title", issue.title.as_str())
        .with_metadata("creator", issue.user_login())
        .with_metadata("created_at", issue.created_at.clone().unwrap_or_default())
        .with_metadata("comments", issue.comments)
        .with_metadata("state", issue.state.as_str())
        .with_metadata("labels", labels)
        .with_metadata(
            "assignee",
            issue
                .assignee
                .as_ref()
                .map(|user| user.login.clone())
                .unwrap_or_default(),
        )
        .with_metadata(
            "milestone",
            issue
                .milestone
                .as_ref()
                .map(|milestone| milestone.title.clone())
                .unwrap_or_default(),
        )
        .with_metadata("locked", issue.locked)
        .with_metadata("number", issue.number)
        .with_metadata("is_pull_request", issue.is_pull_request())
}

/// Convert a tree entry and its decoded content into a document
pub fn file_document(
    api_base_url: &str,
    repository: &RepositoryId,
    branch: &Branch,
    entry: &RestTreeEntry,
    content: String,
) -> Document {
    let source = format!(
        "{}/{}/{}/{}/{}",
        api_base_url,
        repository.full_name(),
        entry.kind,
        branch,
        entry.path
    );

    Document::new(content)
        .with_metadata("path", entry.path.as_str())
        .with_metadata("sha", entry.sha.as_str())
        .with_metadata("source", source)
}
