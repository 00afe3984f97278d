//! Repository-scoped GitHub operations behind a single `run(mode, query)` entry point
//!
//! [`GitHubApiWrapper`] owns the repository reference, the fixed base branch and
//! the mutable active branch. Each [`Mode`] maps to one method in the per-area
//! submodules. Results are human-readable strings meant for an LLM agent.
//!
//! Failures follow two conventions:
//!
//! - read operations (issue/PR details, listings on the base branch, branch
//!   listing and ref lookup) return `Err` on API failures
//! - comment, PR creation, file operations, searches and releases report API
//!   failures as result text so an agent can read and react to them

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

use crate::config::WrapperConfig;
use crate::github::GitHubClient;
use crate::github::rest_types::RestRepository;
use crate::types::{Branch, IssueNumber, RepositoryId};

mod branches;
mod files;
pub mod input;
mod issues;
pub mod mode;
mod pull_requests;
mod releases;
mod search;

pub use branches::MAX_BRANCH_NAME_ATTEMPTS;
pub use input::{PayloadError, WrapperError};
pub use mode::Mode;

/// High-level GitHub operations for one repository
pub struct GitHubApiWrapper {
    client: GitHubClient,
    repository: RepositoryId,
    app_id: String,
    base_branch: Branch,
    active_branch: RwLock<Branch>,
}

impl std::fmt::Debug for GitHubApiWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubApiWrapper")
            .field("repository", &self.repository)
            .field("app_id", &self.app_id)
            .field("base_branch", &self.base_branch)
            .finish_non_exhaustive()
    }
}

impl GitHubApiWrapper {
    /// Creates a wrapper and resolves the repository's default branch.
    ///
    /// # Arguments
    ///
    /// * `config` - Repository, app id and private key are required; the key is
    ///   sent as the bearer token
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing, the repository is not
    /// in `owner/repo` form, or the repository cannot be fetched.
    pub async fn new(config: WrapperConfig) -> Result<Self> {
        let config = config.validate()?;
        let client = GitHubClient::new(
            Some(config.private_key.clone()),
            config.api_base_url.as_deref(),
            config.timeout,
        )?;

        let repository_url = client.endpoint(&config.repository.api_path())?;
        let repository: RestRepository = client
            .get_json(repository_url)
            .await
            .with_context(|| format!("failed to get repository {}", config.repository))?;

        let base_branch = config
            .base_branch
            .unwrap_or_else(|| repository.default_branch.clone());
        let active_branch = config
            .active_branch
            .unwrap_or_else(|| repository.default_branch.clone());

        info!(
            "GitHub wrapper ready for {} (base: {}, active: {})",
            config.repository, base_branch, active_branch
        );

        Ok(Self {
            client,
            repository: config.repository,
            app_id: config.app_id,
            base_branch: Branch::new(base_branch),
            active_branch: RwLock::new(Branch::new(active_branch)),
        })
    }

    /// Build a wrapper around an existing client when both branches are already known.
    ///
    /// No request is made.
    pub fn with_client(
        client: GitHubClient,
        repository: RepositoryId,
        base_branch: Branch,
        active_branch: Branch,
    ) -> Self {
        Self {
            client,
            repository,
            app_id: String::new(),
            base_branch,
            active_branch: RwLock::new(active_branch),
        }
    }

    /// Same as [`GitHubApiWrapper::new`] with every setting read from the environment
    pub async fn from_env() -> Result<Self> {
        Self::new(WrapperConfig::from_env()).await
    }

    pub fn repository(&self) -> &RepositoryId {
        &self.repository
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn base_branch(&self) -> &Branch {
        &self.base_branch
    }

    pub async fn active_branch(&self) -> Branch {
        self.active_branch.read().await.clone()
    }

    async fn switch_active_branch(&self, branch: Branch) {
        let mut active = self.active_branch.write().await;
        info!("Active branch: {} -> {}", active, branch);
        *active = branch;
    }

    fn repo_url(&self, path: &str) -> Result<Url> {
        self.client
            .endpoint(&format!("{}/{}", self.repository.api_path(), path))
    }

    /// Execute one operation.
    ///
    /// # Errors
    ///
    /// Numeric modes fail with [`WrapperError`] when the payload is not a
    /// decimal integer. API failures of read operations are returned as
    /// errors; see the module docs for which operations report them as text.
    pub async fn run(&self, mode: Mode, query: &str) -> Result<String> {
        debug!("Running mode {} ({} byte payload)", mode, query.len());

        match mode {
            Mode::GetIssues => self.get_issues().await,
            Mode::GetIssue => {
                let number = parse_number(query)
                    .ok_or_else(|| WrapperError::InvalidIssueNumber(query.to_string()))?;
                self.get_issue(number).await
            }
            Mode::CommentOnIssue => self.comment_on_issue(query).await,
            Mode::ListOpenPullRequests => self.list_open_pull_requests().await,
            Mode::GetPullRequest => {
                let number = parse_number(query)
                    .ok_or_else(|| WrapperError::InvalidPullRequestNumber(query.to_string()))?;
                self.get_pull_request(number).await
            }
            Mode::CreatePullRequest => self.create_pull_request(query).await,
            Mode::ListPullRequestFiles => {
                let number = parse_number(query)
                    .ok_or_else(|| WrapperError::InvalidPullRequestNumber(query.to_string()))?;
                self.list_pull_request_files(number).await
            }
            Mode::CreateFile => self.create_file(query).await,
            Mode::ReadFile => self.read_file(query).await,
            Mode::UpdateFile => self.update_file(query).await,
            Mode::DeleteFile => self.delete_file(query).await,
            Mode::ListFilesInMainBranch => self.list_files_in_main_branch().await,
            Mode::ListFilesInBotBranch => self.list_files_in_bot_branch().await,
            Mode::ListBranchesInRepo => self.list_branches_in_repo().await,
            Mode::SetActiveBranch => self.set_active_branch(query).await,
            Mode::CreateBranch => self.create_branch(query).await,
            Mode::GetFilesFromDirectory => self.get_files_from_directory(query).await,
            Mode::SearchIssuesAndPrs => self.search_issues_and_prs(query).await,
            Mode::SearchCode => self.search_code(query).await,
            Mode::GetLatestRelease => self.get_latest_release().await,
            Mode::GetReleases => self.get_releases().await,
            Mode::GetRelease => self.get_release(query).await,
        }
    }

    /// [`GitHubApiWrapper::run`] with the mode given by name
    pub async fn run_named(&self, mode: &str, query: &str) -> Result<String> {
        let mode = mode
            .parse::<Mode>()
            .map_err(|_| WrapperError::InvalidMode(mode.to_string()))?;
        self.run(mode, query).await
    }
}

fn parse_number(query: &str) -> Option<IssueNumber> {
    query.trim().parse::<IssueNumber>().ok()
}
