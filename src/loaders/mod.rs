//! Document loaders turning GitHub issues and repository files into [`Document`]s

use anyhow::Result;
use async_trait::async_trait;

use crate::types::Document;

/// Repository file loader
pub mod files;

/// Issue and pull request loader
pub mod issues;

/// Raw API payload to document conversion
pub mod mapper;

/// Text splitting applied by `load_and_split`
pub mod splitter;

pub use files::{GitHubFileLoader, PathFilter};
pub use issues::{GitHubIssuesLoader, MilestoneFilter};
pub use mapper::{file_document, issue_document};
pub use splitter::{CharacterTextSplitter, TextSplitter, split_documents};

/// Source of documents
#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self) -> Result<Vec<Document>>;

    /// Load, then split every document with `splitter`.
    ///
    /// Chunks inherit the metadata of the document they came from.
    async fn load_and_split(&self, splitter: &dyn TextSplitter) -> Result<Vec<Document>> {
        let documents = self.load().await?;
        split_documents(splitter, documents)
    }
}
