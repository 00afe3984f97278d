//! Agent tools and the MCP server exposing them
//!
//! Every tool is a thin named binding of one wrapper [`Mode`](crate::wrapper::Mode):
//! the agent's free-text input is normalised by [`preprocess_input`] and handed to
//! [`GitHubApiWrapper::run`](crate::wrapper::GitHubApiWrapper::run).
//!
//! [`GitHubToolServer`] publishes the same toolkit over the Model Context Protocol.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use rmcp::{Error as McpError, ServerHandler, model::*, tool};
use serde::Serialize;

/// The agent tool bound to a wrapper mode
pub mod agent_tool;

/// Tool lifecycle observers
pub mod callbacks;

/// Error types specific to tool operations
pub mod error;

/// Input normalisation applied before dispatch
pub mod preprocess;

/// The assembled tool set
pub mod toolkit;

pub use agent_tool::GitHubAgentTool;
pub use callbacks::{ToolCallbacks, TracingCallbacks};
pub use error::ToolError;
pub use preprocess::preprocess_input;
pub use toolkit::{GitHubAgentToolkit, ToolkitOptions, tool_catalog};

/// Something an LLM agent can call with a single string input
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    async fn call(&self, input: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ToolSummary<'a> {
    name: &'a str,
    mode: String,
    description: &'a str,
}

/// MCP server publishing a [`GitHubAgentToolkit`]
#[derive(Clone)]
pub struct GitHubToolServer {
    toolkit: Arc<GitHubAgentToolkit>,
}

impl GitHubToolServer {
    pub fn new(toolkit: Arc<GitHubAgentToolkit>) -> Self {
        Self { toolkit }
    }

    pub fn toolkit(&self) -> &GitHubAgentToolkit {
        &self.toolkit
    }

    /// Look up a tool by display name or mode name and call it.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] for an unregistered name, or
    /// [`ToolError::OperationFailed`] when the wrapper rejects the call.
    pub async fn call_tool(&self, tool_name: &str, input: &str) -> Result<String, ToolError> {
        let tool = self
            .toolkit
            .tool_by_name_or_mode(tool_name)
            .ok_or_else(|| ToolError::UnknownTool(tool_name.to_string()))?;

        tool.call(input).await.map_err(|e| match e.downcast::<ToolError>() {
            Ok(tool_error) => tool_error,
            Err(other) => ToolError::OperationFailed(other),
        })
    }

    fn summaries(&self) -> Vec<ToolSummary<'_>> {
        self.toolkit
            .agent_tools()
            .iter()
            .map(|tool| ToolSummary {
                name: tool.name(),
                mode: tool.mode().to_string(),
                description: tool.description(),
            })
            .collect()
    }
}

#[tool(tool_box)]
impl GitHubToolServer {
    #[tool(
        description = "List the GitHub tools available on this server. Returns a JSON array with each tool's name, mode and description. The description explains the exact input format the tool expects."
    )]
    async fn list_github_tools(&self) -> Result<CallToolResult, McpError> {
        let content = Content::text(serde_json::to_string_pretty(&self.summaries()).map_err(
            |e| McpError::internal_error(format!("Failed to serialize tools: {}", e), None),
        )?);

        Ok(CallToolResult {
            content: vec![content],
            is_error: Some(false),
        })
    }

    #[tool(
        description = "Run one GitHub tool against the configured repository. Pass the tool name (e.g. 'Get Issue') or its mode (e.g. 'get_issue') and the tool input as a single string. Examples: `{\"tool_name\": \"get_issue\", \"input\": \"42\"}`, `{\"tool_name\": \"Read File\", \"input\": \"src/main.rs\"}`"
    )]
    async fn run_github_tool(
        &self,

        #[tool(param)]
        #[schemars(
            description = "Tool display name or mode name. Use list_github_tools to see the available tools."
        )]
        tool_name: String,

        #[tool(param)]
        #[schemars(
            description = "Free-text input for the tool, formatted as its description requires. Omit for tools that take no input."
        )]
        input: Option<String>,
    ) -> Result<CallToolResult, McpError> {
        let input = input.unwrap_or_default();
        let output = self
            .call_tool(&tool_name, &input)
            .await
            .map_err(|e| match e {
                ToolError::UnknownTool(_) => McpError::invalid_request(e.to_string(), None),
                ToolError::OperationFailed(_) => McpError::internal_error(e.to_string(), None),
            })?;

        Ok(CallToolResult {
            content: vec![Content::text(output)],
            is_error: Some(false),
        })
    }
}

#[tool(tool_box)]
impl ServerHandler for GitHubToolServer {
    /// Provides information about this MCP server
    fn get_info(&self) -> ServerInfo {
        let release_status = if self.toolkit.include_release_tools() {
            "release tools enabled"
        } else {
            "release tools disabled"
        };

        let instructions = format!(
            r#"GitHub Toolkit MCP Server - {}

## Overview
Exposes a set of GitHub tools bound to one repository. Each tool takes a single free-text input and returns a text report. Write operations act on the current active branch and are refused on the base branch.

## Available Tools

### 1. list_github_tools
List every registered tool with its mode and description.

```json
{{"name": "list_github_tools", "arguments": {{}}}}
```

### 2. run_github_tool
Run a tool by display name or mode name.

Examples:
```json
// Read one issue with its comments
{{"name": "run_github_tool", "arguments": {{"tool_name": "get_issue", "input": "42"}}}}

// Create a working branch, then a file on it
{{"name": "run_github_tool", "arguments": {{"tool_name": "create_branch", "input": "feature/docs"}}}}
{{"name": "run_github_tool", "arguments": {{"tool_name": "create_file", "input": "docs/usage.md\nUsage notes"}}}}

// Replace text in a file
{{"name": "run_github_tool", "arguments": {{"tool_name": "update_file", "input": "README.md\nOLD <<<<\nold text\n>>>> OLD\nNEW <<<<\nnew text\n>>>> NEW"}}}}
```

## Common Workflows

1. **Make a change**: create_branch, then create_file / update_file / delete_file, then create_pull_request
2. **Triage**: get_issues, get_issue, comment_on_issue
3. **Explore**: list_files_in_main_branch, get_files_from_directory, read_file, search_code
"#,
            release_status
        );

        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(instructions),
        }
    }
}
