use anyhow::Result;

use super::GitHubApiWrapper;
use crate::formatter::{SEARCH_RESULT_LIMIT, latest_release_report, release_report, releases_report};
use crate::github::PageRequest;
use crate::github::rest_types::RestRelease;

impl GitHubApiWrapper {
    pub async fn get_latest_release(&self) -> Result<String> {
        let url = self.repo_url("releases/latest")?;
        match self.client.get_json::<RestRelease>(url).await {
            Ok(release) => Ok(latest_release_report(&release)),
            Err(e) => Ok(format!("Failed to get latest release: {}", e)),
        }
    }

    /// The five most recent releases
    pub async fn get_releases(&self) -> Result<String> {
        let url = self.repo_url("releases")?;
        match self
            .client
            .get_paginated::<RestRelease>(url, PageRequest::per_page(SEARCH_RESULT_LIMIT as u32))
            .await
        {
            Ok(releases) => Ok(releases_report(&releases)),
            Err(e) => Ok(format!("Failed to get releases: {}", e)),
        }
    }

    pub async fn get_release(&self, tag_name: &str) -> Result<String> {
        let url = self.repo_url(&format!(
            "releases/tags/{}",
            urlencoding::encode(tag_name.trim())
        ))?;
        match self.client.get_json::<RestRelease>(url).await {
            Ok(release) => Ok(release_report(&release)),
            Err(e) => Ok(format!("Failed to get release: {}", e)),
        }
    }
}
