use anyhow::Result;

use super::GitHubApiWrapper;
use crate::formatter::{SEARCH_RESULT_LIMIT, code_search_report, issue_search_report};
use crate::github::rest_types::{RestSearchCode, RestSearchIssues};

impl GitHubApiWrapper {
    fn search_url(&self, endpoint: &str, query: &str) -> Result<url::Url> {
        let mut url = self.client.endpoint(&format!("search/{}", endpoint))?;
        url.query_pairs_mut()
            .append_pair("q", &format!("{} repo:{}", query.trim(), self.repository))
            .append_pair("per_page", &SEARCH_RESULT_LIMIT.to_string());
        Ok(url)
    }

    pub async fn search_issues_and_prs(&self, query: &str) -> Result<String> {
        let url = self.search_url("issues", query)?;
        match self.client.get_json::<RestSearchIssues>(url).await {
            Ok(result) => Ok(issue_search_report(&result)),
            Err(e) => Ok(format!("Search failed: {}", e)),
        }
    }

    /// Top code hits, each with its content read from the active branch
    pub async fn search_code(&self, query: &str) -> Result<String> {
        let url = self.search_url("code", query)?;
        let result = match self.client.get_json::<RestSearchCode>(url).await {
            Ok(result) => result,
            Err(e) => return Ok(format!("Search failed: {}", e)),
        };

        let branch = self.active_branch().await;
        let mut files = Vec::new();
        for hit in result.items.iter().take(SEARCH_RESULT_LIMIT) {
            let contents = self.read_file_on(&hit.path, &branch).await;
            files.push((hit.path.clone(), contents));
        }

        Ok(code_search_report(result.total_count, &files))
    }
}
