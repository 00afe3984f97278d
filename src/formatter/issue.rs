use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;

use crate::github::rest_types::{RestComment, RestIssue};

/// Maximum number of comments included in issue and PR details
pub const DETAIL_COMMENT_LIMIT: usize = 10;

#[derive(Serialize)]
struct IssueSummary<'a> {
    title: &'a str,
    number: u64,
    #[serde(skip_serializing_if = "str::is_empty")]
    opened_by: &'a str,
}

#[derive(Serialize)]
pub(crate) struct CommentSummary<'a> {
    body: &'a str,
    user: &'a str,
}

pub(crate) fn comment_summaries(comments: &[RestComment]) -> Vec<CommentSummary<'_>> {
    comments
        .iter()
        .take(DETAIL_COMMENT_LIMIT)
        .map(|c| CommentSummary {
            body: c.body.as_deref().unwrap_or_default(),
            user: c.user.as_ref().map(|u| u.login.as_str()).unwrap_or_default(),
        })
        .collect()
}

/// Summary of open issues for the `get_issues` mode.
///
/// Pull requests must already be filtered out by the caller.
pub fn issue_list_report(issues: &[RestIssue]) -> Result<String> {
    if issues.is_empty() {
        return Ok("No open issues available".to_string());
    }

    let summaries: Vec<IssueSummary> = issues
        .iter()
        .map(|issue| IssueSummary {
            title: &issue.title,
            number: issue.number,
            opened_by: issue.user.as_ref().map(|u| u.login.as_str()).unwrap_or_default(),
        })
        .collect();

    let listing = serde_json::to_string(&summaries).context("Failed to serialize issues")?;
    Ok(format!("Found {} issues:\n{}", summaries.len(), listing))
}

/// JSON object for the `get_issue` mode; `comments` is itself a JSON string
pub fn issue_detail_json(issue: &RestIssue, comments: &[RestComment]) -> Result<String> {
    let comments = serde_json::to_string(&comment_summaries(comments))
        .context("Failed to serialize issue comments")?;

    let detail = json!({
        "number": issue.number,
        "title": issue.title,
        "body": issue.body.as_deref().unwrap_or_default(),
        "comments": comments,
        "opened_by": issue.user_login(),
    });
    serde_json::to_string(&detail).context("Failed to serialize issue")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::rest_types::RestUser;

    fn issue(number: u64, title: &str, login: Option<&str>) -> RestIssue {
        serde_json::from_value(json!({
            "number": number,
            "title": title,
            "user": login.map(|l| json!({"login": l})),
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_issue_list() {
        assert_eq!(issue_list_report(&[]).unwrap(), "No open issues available");
    }

    #[test]
    fn test_issue_list_report() {
        let report =
            issue_list_report(&[issue(1, "First", Some("alice")), issue(2, "Second", None)]).unwrap();
        assert_eq!(
            report,
            r#"Found 2 issues:
[{"title":"First","number":1,"opened_by":"alice"},{"title":"Second","number":2}]"#
        );
    }

    #[test]
    fn test_issue_detail_embeds_comments_as_string() {
        let comments = vec![RestComment {
            body: Some("looks good".to_string()),
            user: Some(RestUser {
                login: "bob".to_string(),
            }),
        }];
        let detail = issue_detail_json(&issue(7, "Bug", Some("alice")), &comments).unwrap();
        let value: serde_json::Value = serde_json::from_str(&detail).unwrap();
        assert_eq!(value["number"], 7);
        assert_eq!(value["opened_by"], "alice");
        assert_eq!(value["body"], "");
        assert_eq!(value["comments"], r#"[{"body":"looks good","user":"bob"}]"#);
    }
}
