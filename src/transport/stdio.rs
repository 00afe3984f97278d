use anyhow::Result;
use rmcp::ServiceExt;
use rmcp::transport::stdio;

use super::build_tool_server;
use crate::config::WrapperConfig;
use crate::tools::ToolkitOptions;

/// Serve the toolkit over stdin/stdout until the client disconnects.
///
/// Used when an MCP client launches the binary as a subprocess. Logging must
/// go to stderr, stdout carries the protocol.
///
/// ```no_run
/// # use github_toolkit::config::WrapperConfig;
/// # use github_toolkit::tools::ToolkitOptions;
/// # use github_toolkit::transport::stdio::run_stdio_server;
/// # async fn example() -> anyhow::Result<()> {
/// let config = WrapperConfig::new("owner/repo", "12345", "ghp_xxxxxxxxxxxx");
/// run_stdio_server(config, ToolkitOptions::default()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_stdio_server(config: WrapperConfig, options: ToolkitOptions) -> Result<()> {
    let tool_server = build_tool_server(config, options).await?;
    let running = tool_server.serve(stdio()).await?;
    tracing::info!("MCP server listening on stdio");

    running.waiting().await?;
    tracing::info!("MCP stdio session ended");
    Ok(())
}
