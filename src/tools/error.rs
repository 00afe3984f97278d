//! Error types for the agent tools and the MCP server

use std::fmt;

/// Errors raised by tool invocations
#[derive(Debug)]
pub enum ToolError {
    /// The wrapper rejected the input or the GitHub API call failed
    OperationFailed(anyhow::Error),

    /// No tool with the requested name is registered
    UnknownTool(String),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::OperationFailed(source) => {
                write!(f, "GitHub operation failed: {:#}", source)
            }
            ToolError::UnknownTool(name) => write!(f, "Unknown tool: '{}'", name),
        }
    }
}

impl std::error::Error for ToolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolError::OperationFailed(source) => Some(&**source),
            ToolError::UnknownTool(_) => None,
        }
    }
}

/// Convert from ToolError to a plain String for the MCP tool function result
impl From<ToolError> for String {
    fn from(error: ToolError) -> Self {
        error.to_string()
    }
}
