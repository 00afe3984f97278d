use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info};
use url::Url;

use super::Loader;
use super::mapper::issue_document;
use crate::config::{ConfigError, resolve_access_token};
use crate::github::rest_types::RestIssue;
use crate::github::{DEFAULT_API_BASE_URL, GitHubClient, PageRequest};
use crate::types::{Document, IssueSort, IssueState, RepositoryId, SortDirection};

/// Milestone filter accepted by the issues endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneFilter {
    Number(u64),
    /// `*`, any milestone
    Any,
    /// `none`, no milestone
    Unassigned,
}

impl fmt::Display for MilestoneFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{}", number),
            Self::Any => write!(f, "*"),
            Self::Unassigned => write!(f, "none"),
        }
    }
}

impl FromStr for MilestoneFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "*" => Ok(Self::Any),
            "none" => Ok(Self::Unassigned),
            other => other
                .parse::<u64>()
                .map(Self::Number)
                .map_err(|_| format!("invalid milestone filter: {} (expected a number, * or none)", s)),
        }
    }
}

/// Loads a repository's issues, and optionally its pull requests, as documents.
///
/// Without explicit page bounds every page is walked through the `Link`
/// header. Setting [`with_pagination`](Self::with_pagination) fetches exactly
/// one page.
#[derive(Debug, Clone)]
pub struct GitHubIssuesLoader {
    repository: RepositoryId,
    access_token: String,
    api_base_url: String,
    include_prs: bool,
    milestone: Option<MilestoneFilter>,
    state: Option<IssueState>,
    assignee: Option<String>,
    creator: Option<String>,
    mentioned: Option<String>,
    labels: Vec<String>,
    sort: Option<IssueSort>,
    direction: Option<SortDirection>,
    since: Option<DateTime<Utc>>,
    page: Option<u32>,
    per_page: Option<u32>,
}

impl GitHubIssuesLoader {
    /// Creates a loader for `repository` (`owner/repo`).
    ///
    /// # Arguments
    ///
    /// * `repository` - Repository in `owner/repo` form
    /// * `access_token` - Token to use; `GITHUB_PERSONAL_ACCESS_TOKEN` is read when `None`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the repository is empty or malformed, or
    /// when no access token can be found.
    pub fn new(repository: &str, access_token: Option<String>) -> Result<Self, ConfigError> {
        if repository.trim().is_empty() {
            return Err(ConfigError::EmptyRepository);
        }
        let repository =
            RepositoryId::parse(repository).map_err(ConfigError::InvalidRepository)?;
        let access_token = resolve_access_token(access_token)?;

        Ok(Self {
            repository,
            access_token,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            include_prs: true,
            milestone: None,
            state: Some(IssueState::Open),
            assignee: None,
            creator: None,
            mentioned: None,
            labels: Vec::new(),
            sort: None,
            direction: None,
            since: None,
            page: None,
            per_page: None,
        })
    }

    pub fn with_api_base_url<S: Into<String>>(mut self, api_base_url: S) -> Self {
        self.api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_include_prs(mut self, include_prs: bool) -> Self {
        self.include_prs = include_prs;
        self
    }

    pub fn with_milestone(mut self, milestone: MilestoneFilter) -> Self {
        self.milestone = Some(milestone);
        self
    }

    pub fn with_state(mut self, state: IssueState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_assignee<S: Into<String>>(mut self, assignee: S) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_creator<S: Into<String>>(mut self, creator: S) -> Self {
        self.creator = Some(creator.into());
        self
    }

    pub fn with_mentioned<S: Into<String>>(mut self, mentioned: S) -> Self {
        self.mentioned = Some(mentioned.into());
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sort(mut self, sort: IssueSort, direction: SortDirection) -> Self {
        self.sort = Some(sort);
        self.direction = Some(direction);
        self
    }

    /// Only issues updated at or after `since`
    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_pagination(mut self, page: u32, per_page: u32) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }

    pub fn repository(&self) -> &RepositoryId {
        &self.repository
    }

    fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }

    fn filtered_url(&self) -> Result<Url> {
        let raw = format!(
            "{}/{}/issues",
            self.api_base_url,
            self.repository.api_path()
        );
        let mut url = Url::parse(&raw).with_context(|| format!("Invalid issues URL: {}", raw))?;

        {
            let mut pairs = url.query_pairs_mut();
            if let Some(milestone) = &self.milestone {
                pairs.append_pair("milestone", &milestone.to_string());
            }
            if let Some(state) = &self.state {
                pairs.append_pair("state", state.as_ref());
            }
            if let Some(assignee) = &self.assignee {
                pairs.append_pair("assignee", assignee);
            }
            if let Some(creator) = &self.creator {
                pairs.append_pair("creator", creator);
            }
            if let Some(mentioned) = &self.mentioned {
                pairs.append_pair("mentioned", mentioned);
            }
            if !self.labels.is_empty() {
                pairs.append_pair("labels", &self.labels.join(","));
            }
            if let Some(sort) = &self.sort {
                pairs.append_pair("sort", sort.as_ref());
            }
            if let Some(direction) = &self.direction {
                pairs.append_pair("direction", direction.as_ref());
            }
            if let Some(since) = &self.since {
                pairs.append_pair("since", &since.to_rfc3339_opts(SecondsFormat::Secs, true));
            }
        }

        // `query_pairs_mut` leaves a dangling `?` when nothing was appended
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    /// The first request URL, filters and page bounds form-encoded
    pub fn build_url(&self) -> Result<Url> {
        let mut url = self.filtered_url()?;
        self.page_request().apply(&mut url);
        Ok(url)
    }
}

#[async_trait]
impl Loader for GitHubIssuesLoader {
    async fn load(&self) -> Result<Vec<Document>> {
        let client = GitHubClient::new(
            Some(self.access_token.clone()),
            Some(&self.api_base_url),
            None,
        )?;
        let url = self.filtered_url()?;
        debug!("Loading issues from {}", url);

        let issues: Vec<RestIssue> = client
            .get_paginated(url, self.page_request())
            .await
            .with_context(|| format!("failed to fetch issues for {}", self.repository))?;

        let documents: Vec<Document> = issues
            .iter()
            .filter(|issue| self.include_prs || !issue.is_pull_request())
            .map(issue_document)
            .collect();

        info!(
            "Loaded {} issue documents from {}",
            documents.len(),
            self.repository
        );
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn loader() -> GitHubIssuesLoader {
        GitHubIssuesLoader::new("owner/repo", Some("token".to_string())).unwrap()
    }

    #[test]
    fn test_empty_repository_rejected() {
        let err = GitHubIssuesLoader::new("  ", Some("token".to_string())).unwrap_err();
        assert_eq!(err.to_string(), "repository cannot be empty");
    }

    #[test]
    fn test_default_url_only_filters_open() {
        let url = loader().build_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/owner/repo/issues?state=open"
        );
    }

    #[test]
    fn test_labels_comma_joined_and_form_encoded() {
        let url = loader()
            .with_labels(["bug", "enhancement"])
            .with_assignee("octo cat")
            .build_url()
            .unwrap();
        let url = url.as_str();
        assert!(url.starts_with("https://api.github.com/repos/owner/repo/issues?"));
        assert!(url.contains("labels=bug%2Cenhancement"));
        assert!(url.contains("assignee=octo+cat"));
    }

    #[test]
    fn test_all_filters() {
        let since = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let url = loader()
            .with_milestone(MilestoneFilter::Any)
            .with_state(IssueState::All)
            .with_creator("alice")
            .with_mentioned("bob")
            .with_sort(IssueSort::Updated, SortDirection::Asc)
            .with_since(since)
            .with_pagination(2, 50)
            .build_url()
            .unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("milestone=*"));
        assert!(query.contains("state=all"));
        assert!(query.contains("creator=alice"));
        assert!(query.contains("mentioned=bob"));
        assert!(query.contains("sort=updated&direction=asc"));
        assert!(query.contains("since=2024-01-02T03%3A04%3A05Z"));
        assert!(query.ends_with("page=2&per_page=50"));
    }

    #[test]
    fn test_milestone_filter_parse() {
        assert_eq!("*".parse::<MilestoneFilter>().unwrap(), MilestoneFilter::Any);
        assert_eq!("none".parse::<MilestoneFilter>().unwrap(), MilestoneFilter::Unassigned);
        assert_eq!("7".parse::<MilestoneFilter>().unwrap(), MilestoneFilter::Number(7));
        assert!("soon".parse::<MilestoneFilter>().is_err());
        assert_eq!(MilestoneFilter::Number(7).to_string(), "7");
    }
}
