use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use futures::{StreamExt, stream};
use tracing::{debug, info, warn};

use super::Loader;
use super::mapper::file_document;
use crate::config::{ConfigError, resolve_access_token};
use crate::github::client::encode_path;
use crate::github::rest_types::{RestContentEntry, RestTree, RestTreeEntry};
use crate::github::{ApiError, DEFAULT_API_BASE_URL, GitHubClient};
use crate::types::{Branch, Document, RepositoryId};

/// Predicate deciding which repository paths are loaded
pub type PathFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

const DEFAULT_BRANCH: &str = "main";
const DEFAULT_CONCURRENCY: usize = 8;

/// Loads every file of a branch as one document per file.
///
/// Directories are skipped, and so are files that fail to download or decode
/// and files with empty content.
#[derive(Clone)]
pub struct GitHubFileLoader {
    repository: RepositoryId,
    access_token: String,
    api_base_url: String,
    branch: Branch,
    filter: Option<PathFilter>,
    concurrency: usize,
}

impl std::fmt::Debug for GitHubFileLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubFileLoader")
            .field("repository", &self.repository)
            .field("api_base_url", &self.api_base_url)
            .field("branch", &self.branch)
            .field("filtered", &self.filter.is_some())
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl GitHubFileLoader {
    /// Creates a loader for the `main` branch of `repository` (`owner/repo`).
    ///
    /// # Errors
    ///
    /// Same as [`GitHubIssuesLoader::new`](super::GitHubIssuesLoader::new).
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
            branch: Branch::new(DEFAULT_BRANCH),
            filter: None,
            concurrency: DEFAULT_CONCURRENCY,
        })
    }

    pub fn with_api_base_url<S: Into<String>>(mut self, api_base_url: S) -> Self {
        self.api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_branch<B: Into<Branch>>(mut self, branch: B) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Number of file downloads kept in flight, at least 1
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn branch(&self) -> &Branch {
        &self.branch
    }

    fn client(&self) -> Result<GitHubClient> {
        GitHubClient::new(
            Some(self.access_token.clone()),
            Some(&self.api_base_url),
            None,
        )
    }

    fn accepts(&self, path: &str) -> bool {
        self.filter.as_ref().is_none_or(|filter| filter(path))
    }

    async fn tree_entries(&self, client: &GitHubClient) -> Result<Vec<RestTreeEntry>> {
        let mut url = client.endpoint(&format!(
            "{}/git/trees/{}",
            self.repository.api_path(),
            encode_path(self.branch.as_str())
        ))?;
        url.query_pairs_mut().append_pair("recursive", "1");

        let tree: RestTree = client.get_json(url).await.map_err(|e| match e {
            ApiError::Decode(details) => anyhow!("invalid tree response format: {}", details),
            other => anyhow::Error::new(other).context("failed to fetch file tree"),
        })?;
        if tree.truncated {
            warn!(
                "File tree of {}@{} is truncated; some files will be missing",
                self.repository, self.branch
            );
        }
        Ok(tree.tree)
    }

    async fn file_content(&self, client: &GitHubClient, path: &str) -> Result<String> {
        let mut url = client.endpoint(&format!(
            "{}/contents/{}",
            self.repository.api_path(),
            encode_path(path)
        ))?;
        url.query_pairs_mut().append_pair("ref", self.branch.as_str());

        let entry: RestContentEntry = client
            .get_json(url)
            .await
            .with_context(|| format!("failed to fetch file content for {}", path))?;
        entry.decoded_content()
    }
}

#[async_trait]
impl Loader for GitHubFileLoader {
    async fn load(&self) -> Result<Vec<Document>> {
        let client = self.client()?;
        let entries = self.tree_entries(&client).await?;

        let blobs: Vec<RestTreeEntry> = entries
            .into_iter()
            .filter(|entry| entry.kind == "blob" && self.accepts(&entry.path))
            .collect();
        debug!("Fetching {} files from {}@{}", blobs.len(), self.repository, self.branch);

        let client = &client;
        let fetched: Vec<(RestTreeEntry, Result<String>)> = stream::iter(blobs)
            .map(|entry| async move {
                let content = self.file_content(client, &entry.path).await;
                (entry, content)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut documents = Vec::new();
        for (entry, content) in fetched {
            match content {
                Ok(content) if content.is_empty() => {}
                Ok(content) => documents.push(file_document(
                    &self.api_base_url,
                    &self.repository,
                    &self.branch,
                    &entry,
                    content,
                )),
                Err(e) => warn!("Skipping {}: {:#}", entry.path, e),
            }
        }

        info!(
            "Loaded {} file documents from {}@{}",
            documents.len(),
            self.repository,
            self.branch
        );
        Ok(documents)
    }
}
