use anyhow::{Context, Result};
use tracing::{info, warn};

use super::GitHubApiWrapper;
use super::input::PullRequestPayload;
use crate::formatter::issue::DETAIL_COMMENT_LIMIT;
use crate::formatter::{
    pull_request_detail_json, pull_request_files_report, pull_request_list_report,
};
use crate::github::PageRequest;
use crate::github::rest_types::{
    NewPullRequest, RestCommit, RestPullRequest, RestPullRequestFile,
};
use crate::types::IssueNumber;

impl GitHubApiWrapper {
    pub async fn list_open_pull_requests(&self) -> Result<String> {
        let mut url = self.repo_url("pulls")?;
        url.query_pairs_mut().append_pair("state", "open");

        let pull_requests: Vec<RestPullRequest> = self
            .client
            .get_paginated(url, PageRequest::default())
            .await
            .context("failed to fetch pull requests")?;
        pull_request_list_report(&pull_requests)
    }

    /// PR details; comments and commits are best effort
    pub async fn get_pull_request(&self, number: IssueNumber) -> Result<String> {
        let pull_request: RestPullRequest = self
            .client
            .get_json(self.repo_url(&format!("pulls/{}", number))?)
            .await
            .context("failed to get pull request")?;

        let comments = match self.fetch_comments(number).await {
            Ok(comments) => Some(comments),
            Err(e) => {
                warn!("Skipping comments of PR #{}: {}", number, e);
                None
            }
        };

        let commits_url = self.repo_url(&format!("pulls/{}/commits", number))?;
        let commits: Option<Vec<RestCommit>> = match self
            .client
            .get_paginated(commits_url, PageRequest::per_page(DETAIL_COMMENT_LIMIT as u32))
            .await
        {
            Ok(commits) => Some(commits),
            Err(e) => {
                warn!("Skipping commits of PR #{}: {}", number, e);
                None
            }
        };

        pull_request_detail_json(&pull_request, comments.as_deref(), commits.as_deref())
    }

    /// Open a PR from the active branch into the base branch
    pub async fn create_pull_request(&self, query: &str) -> Result<String> {
        let head = self.active_branch().await;
        if head == self.base_branch {
            return Ok(
                "Cannot make a pull request because commits are already in the main or master branch."
                    .to_string(),
            );
        }

        let payload = PullRequestPayload::parse(query);
        let body = NewPullRequest {
            title: &payload.title,
            body: &payload.body,
            head: head.as_str(),
            base: self.base_branch.as_str(),
        };

        match self
            .client
            .post_json::<_, RestPullRequest>(self.repo_url("pulls")?, &body)
            .await
        {
            Ok(created) => {
                info!("Created PR #{} from {} into {}", created.number, head, self.base_branch);
                Ok(format!("Successfully created PR number {}", created.number))
            }
            Err(e) => Ok(format!("Unable to make pull request due to error:\n{}", e)),
        }
    }

    pub async fn list_pull_request_files(&self, number: IssueNumber) -> Result<String> {
        let url = self.repo_url(&format!("pulls/{}/files", number))?;
        let files: Vec<RestPullRequestFile> = self
            .client
            .get_paginated(url, PageRequest::default())
            .await
            .with_context(|| format!("failed to fetch files for PR #{}", number))?;
        Ok(pull_request_files_report(number.value(), &files))
    }
}
