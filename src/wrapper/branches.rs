use anyhow::{Context, Result};
use tracing::{debug, info};

use super::GitHubApiWrapper;
use crate::formatter::branch_names_report;
use crate::github::PageRequest;
use crate::github::client::encode_path;
use crate::github::rest_types::{NewGitRef, RestBranch, RestGitRef};
use crate::types::Branch;

/// Upper bound on names tried by [`GitHubApiWrapper::create_branch`]
pub const MAX_BRANCH_NAME_ATTEMPTS: usize = 1000;

/// `proposed`, then `proposed_v1`, `proposed_v2`, ...
fn candidate_branch_name(proposed: &str, attempt: usize) -> String {
    if attempt == 0 {
        proposed.to_string()
    } else {
        format!("{}_v{}", proposed, attempt)
    }
}

impl GitHubApiWrapper {
    async fn branch_names(&self) -> Result<Vec<String>> {
        let branches: Vec<RestBranch> = self
            .client
            .get_paginated(self.repo_url("branches")?, PageRequest::default())
            .await
            .context("failed to list branches")?;
        Ok(branches.into_iter().map(|b| b.name).collect())
    }

    pub async fn list_branches_in_repo(&self) -> Result<String> {
        let names = self.branch_names().await?;
        Ok(branch_names_report(&names))
    }

    /// Switch the active branch if it exists on the remote
    pub async fn set_active_branch(&self, branch_name: &str) -> Result<String> {
        let branch_name = branch_name.trim();
        let names = self.branch_names().await?;

        if !names.iter().any(|name| name == branch_name) {
            return Ok(format!(
                "Error {} does not exist, in repo with current branches: [{}]",
                branch_name,
                names.join(", ")
            ));
        }

        self.switch_active_branch(Branch::new(branch_name)).await;
        Ok(format!("Switched to branch `{}`", branch_name))
    }

    /// Create a branch at the base branch head and make it active.
    ///
    /// Name collisions are retried with a `_v<N>` suffix, up to
    /// [`MAX_BRANCH_NAME_ATTEMPTS`] names in total. Any other API failure is
    /// returned as an error immediately.
    pub async fn create_branch(&self, proposed_branch_name: &str) -> Result<String> {
        let proposed = proposed_branch_name.trim();

        let base_ref_url = self.repo_url(&format!(
            "git/ref/heads/{}",
            encode_path(self.base_branch.as_str())
        ))?;
        let base_ref: RestGitRef = self
            .client
            .get_json(base_ref_url)
            .await
            .context("failed to get base branch")?;

        let refs_url = self.repo_url("git/refs")?;
        for attempt in 0..MAX_BRANCH_NAME_ATTEMPTS {
            let name = candidate_branch_name(proposed, attempt);
            let body = NewGitRef {
                reference: format!("refs/heads/{}", name),
                sha: &base_ref.object.sha,
            };

            match self
                .client
                .post_json::<_, RestGitRef>(refs_url.clone(), &body)
                .await
            {
                Ok(_) => {
                    info!("Created branch {} from {}", name, self.base_branch);
                    self.switch_active_branch(Branch::new(name.clone())).await;
                    return Ok(format!(
                        "Branch '{}' created successfully, and set as current active branch.",
                        name
                    ));
                }
                Err(e) if e.is_reference_already_exists() => {
                    debug!("Branch name {} is taken, trying the next suffix", name);
                }
                Err(e) => return Err(e).context("failed to create branch"),
            }
        }

        Ok(format!(
            "Unable to create branch. At least {} branches exist with named derived from proposed_branch_name: `{}`",
            MAX_BRANCH_NAME_ATTEMPTS, proposed
        ))
    }
}
