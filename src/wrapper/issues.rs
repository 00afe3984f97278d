use anyhow::{Context, Result};
use tracing::{info, warn};

use super::GitHubApiWrapper;
use super::input::CommentPayload;
use crate::formatter::issue::DETAIL_COMMENT_LIMIT;
use crate::formatter::{issue_detail_json, issue_list_report};
use crate::github::PageRequest;
use crate::github::rest_types::{NewComment, RestComment, RestIssue};
use crate::types::IssueNumber;

impl GitHubApiWrapper {
    /// All open issues, pull requests excluded
    pub async fn get_issues(&self) -> Result<String> {
        let mut url = self.repo_url("issues")?;
        url.query_pairs_mut().append_pair("state", "open");

        let issues: Vec<RestIssue> = self
            .client
            .get_paginated(url, PageRequest::default())
            .await
            .context("failed to fetch issues")?;

        let issues: Vec<RestIssue> = issues
            .into_iter()
            .filter(|issue| !issue.is_pull_request())
            .collect();
        issue_list_report(&issues)
    }

    /// Issue details with its first comments, as a JSON object
    pub async fn get_issue(&self, number: IssueNumber) -> Result<String> {
        let issue: RestIssue = self
            .client
            .get_json(self.repo_url(&format!("issues/{}", number))?)
            .await
            .context("failed to get issue")?;

        let comments = self
            .fetch_comments(number)
            .await
            .context("failed to get comments")?;

        issue_detail_json(&issue, &comments)
    }

    pub(crate) async fn fetch_comments(&self, number: IssueNumber) -> Result<Vec<RestComment>> {
        let url = self.repo_url(&format!("issues/{}/comments", number))?;
        let comments = self
            .client
            .get_paginated(url, PageRequest::per_page(DETAIL_COMMENT_LIMIT as u32))
            .await?;
        Ok(comments)
    }

    /// Post a comment from a `"<number>\n\n<comment>"` payload
    pub async fn comment_on_issue(&self, query: &str) -> Result<String> {
        let payload = match CommentPayload::parse(query) {
            Ok(payload) => payload,
            Err(e) => return Ok(e.to_string()),
        };

        let url = self.repo_url(&format!("issues/{}/comments", payload.issue_number))?;
        let body = NewComment {
            body: &payload.comment,
        };
        match self.client.post_json::<_, serde_json::Value>(url, &body).await {
            Ok(_) => {
                info!("Commented on issue {}", payload.issue_number);
                Ok(format!("Commented on issue {}", payload.issue_number))
            }
            Err(e) => {
                warn!("Comment on issue {} failed: {}", payload.issue_number, e);
                Ok(format!("Unable to make comment due to error:\n{}", e))
            }
        }
    }
}
