//! Transport layer implementations for the MCP server
//!
//! The server can run over stdio (launched as a subprocess by an MCP client)
//! or over HTTP with Server-Sent Events.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::WrapperConfig;
use crate::tools::{GitHubAgentToolkit, GitHubToolServer, ToolkitOptions, TracingCallbacks};
use crate::wrapper::GitHubApiWrapper;

/// SSE (Server-Sent Events) transport for HTTP-based MCP communication
pub mod sse_server;

/// Standard I/O transport for subprocess-based MCP communication
pub mod stdio;

/// Connect the wrapper and assemble the tool server both transports share.
///
/// # Errors
///
/// Returns an error if the configuration is incomplete or the repository
/// cannot be reached.
pub async fn build_tool_server(
    config: WrapperConfig,
    options: ToolkitOptions,
) -> Result<GitHubToolServer> {
    let wrapper = GitHubApiWrapper::new(config)
        .await
        .context("Failed to initialize GitHub API wrapper")?;
    tracing::info!(
        "Serving tools for {} (base branch `{}`)",
        wrapper.repository(),
        wrapper.base_branch()
    );

    let toolkit =
        GitHubAgentToolkit::with_callbacks(Arc::new(wrapper), options, Arc::new(TracingCallbacks));
    Ok(GitHubToolServer::new(Arc::new(toolkit)))
}
