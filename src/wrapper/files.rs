use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use super::GitHubApiWrapper;
use super::input::{FileUpdatePayload, NewFilePayload, normalize_path};
use crate::formatter::{branch_listing_report, main_branch_listing_report, protected_branch_report};
use crate::github::ApiError;
use crate::github::client::encode_path;
use crate::github::rest_types::{FileCommit, RestContentEntry, RestContents};
use crate::types::Branch;

const UPDATE_NOOP_REPORT: &str = "File content was not updated because old content was not found. It may be helpful to use the read_file action to get the current file contents.";

fn into_entries(contents: RestContents) -> Vec<RestContentEntry> {
    match contents {
        RestContents::Directory(entries) => entries,
        RestContents::File(entry) => vec![entry],
    }
}

impl GitHubApiWrapper {
    async fn fetch_contents(&self, path: &str, branch: &Branch) -> Result<RestContents> {
        let encoded = encode_path(path);
        let mut url = if encoded.is_empty() {
            self.repo_url("contents")?
        } else {
            self.repo_url(&format!("contents/{}", encoded))?
        };
        url.query_pairs_mut().append_pair("ref", branch.as_str());

        let contents = self.client.get_json(url).await?;
        Ok(contents)
    }

    /// Single file entry with content and blob SHA
    async fn fetch_file(&self, path: &str, branch: &Branch) -> Result<RestContentEntry> {
        match self.fetch_contents(path, branch).await? {
            RestContents::File(entry) if !entry.is_dir() => Ok(entry),
            _ => bail!("`{}` is a directory", path),
        }
    }

    /// Paths of every file under `directory`, depth first.
    ///
    /// The top-level listing must succeed; unreadable subdirectories are
    /// skipped.
    async fn list_files(&self, directory: &str, branch: &Branch) -> Result<Vec<String>> {
        let root = self.fetch_contents(directory, branch).await?;

        let mut files = Vec::new();
        let mut stack: Vec<RestContentEntry> = into_entries(root).into_iter().rev().collect();
        while let Some(entry) = stack.pop() {
            if !entry.is_dir() {
                files.push(entry.path);
                continue;
            }
            match self.fetch_contents(&entry.path, branch).await {
                Ok(contents) => stack.extend(into_entries(contents).into_iter().rev()),
                Err(e) => warn!("Skipping unreadable directory `{}`: {}", entry.path, e),
            }
        }
        Ok(files)
    }

    /// File content on the active branch; a missing file is reported as text
    pub async fn read_file(&self, path: &str) -> Result<String> {
        let branch = self.active_branch().await;
        Ok(self.read_file_on(normalize_path(path), &branch).await)
    }

    pub(crate) async fn read_file_on(&self, path: &str, branch: &Branch) -> String {
        let entry = match self.fetch_file(path, branch).await {
            Ok(entry) => entry,
            Err(e) => {
                return format!(
                    "File not found `{}` on branch `{}`. Error: {}",
                    path, branch, e
                );
            }
        };
        match entry.decoded_content() {
            Ok(content) => content,
            Err(e) => format!("Failed to decode file content: {}", e),
        }
    }

    /// Create a file from a `"<path>\n<contents>"` payload on the active branch
    pub async fn create_file(&self, query: &str) -> Result<String> {
        let branch = self.active_branch().await;
        if branch == self.base_branch {
            return Ok(protected_branch_report(&self.base_branch));
        }

        let payload = match NewFilePayload::parse(query) {
            Ok(payload) => payload,
            Err(e) => return Ok(e.to_string()),
        };

        match self.fetch_file(&payload.path, &branch).await {
            Ok(_) => {
                return Ok(format!(
                    "File already exists at `{}` on branch `{}`. You must use `update_file` to modify it.",
                    payload.path, branch
                ));
            }
            Err(e) => {
                let missing = e
                    .downcast_ref::<ApiError>()
                    .is_some_and(ApiError::is_not_found);
                if !missing {
                    return Ok(format!("Unable to make file due to error:\n{}", e));
                }
            }
        }

        let url = self.repo_url(&format!("contents/{}", encode_path(&payload.path)))?;
        let commit = FileCommit::create(&payload.path, &payload.contents, branch.as_str());
        match self.client.put_json::<_, serde_json::Value>(url, &commit).await {
            Ok(_) => {
                info!("Created file {} on branch {}", payload.path, branch);
                Ok(format!("Created file {}", payload.path))
            }
            Err(e) => Ok(format!("Unable to make file due to error:\n{}", e)),
        }
    }

    /// Replace the `OLD <<<<` block with the `NEW <<<<` block in a file on the
    /// active branch, guarded by the file's current SHA
    pub async fn update_file(&self, query: &str) -> Result<String> {
        let branch = self.active_branch().await;
        if branch == self.base_branch {
            return Ok(protected_branch_report(&self.base_branch));
        }

        let payload = match FileUpdatePayload::parse(query) {
            Ok(payload) => payload,
            Err(e) => return Ok(e.to_string()),
        };

        let entry = match self.fetch_file(&payload.path, &branch).await {
            Ok(entry) => entry,
            Err(e) => {
                return Ok(format!(
                    "File not found `{}` on branch `{}`. Error: {}",
                    payload.path, branch, e
                ));
            }
        };
        let current = match entry.decoded_content() {
            Ok(content) => content,
            Err(e) => return Ok(format!("Failed to decode file content: {}", e)),
        };

        let Some(updated) = payload.apply(&current) else {
            return Ok(UPDATE_NOOP_REPORT.to_string());
        };

        let url = self.repo_url(&format!("contents/{}", encode_path(&payload.path)))?;
        let commit = FileCommit::update(&payload.path, &updated, branch.as_str(), &entry.sha);
        match self.client.put_json::<_, serde_json::Value>(url, &commit).await {
            Ok(_) => {
                info!("Updated file {} on branch {}", payload.path, branch);
                Ok(format!("Updated file {}", payload.path))
            }
            Err(e) => Ok(format!("Unable to update file due to error:\n{}", e)),
        }
    }

    pub async fn delete_file(&self, path: &str) -> Result<String> {
        let branch = self.active_branch().await;
        if branch == self.base_branch {
            return Ok(protected_branch_report(&self.base_branch));
        }

        let path = normalize_path(path);
        let entry = match self.fetch_file(path, &branch).await {
            Ok(entry) => entry,
            Err(e) => return Ok(format!("Unable to delete file due to error:\n{}", e)),
        };

        let url = self.repo_url(&format!("contents/{}", encode_path(path)))?;
        let commit = FileCommit::delete(path, branch.as_str(), &entry.sha);
        match self.client.delete_json(url, &commit).await {
            Ok(()) => {
                info!("Deleted file {} on branch {}", path, branch);
                Ok(format!("Deleted file {}", path))
            }
            Err(e) => Ok(format!("Unable to delete file due to error:\n{}", e)),
        }
    }

    pub async fn list_files_in_main_branch(&self) -> Result<String> {
        let files = self
            .list_files("", &self.base_branch)
            .await
            .context("failed to list files in main branch")?;
        Ok(main_branch_listing_report(&files))
    }

    pub async fn list_files_in_bot_branch(&self) -> Result<String> {
        let branch = self.active_branch().await;
        match self.list_files("", &branch).await {
            Ok(files) => Ok(branch_listing_report(&branch, &files)),
            Err(e) => Ok(format!("Error: {}", e)),
        }
    }

    /// Newline-separated file paths under `directory` on the active branch
    pub async fn get_files_from_directory(&self, directory: &str) -> Result<String> {
        let branch = self.active_branch().await;
        match self.list_files(normalize_path(directory), &branch).await {
            Ok(files) => Ok(files.join("\n")),
            Err(e) => Ok(format!("Error: {}", e)),
        }
    }
}
