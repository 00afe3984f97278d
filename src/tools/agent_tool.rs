use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::Tool;
use super::callbacks::ToolCallbacks;
use super::error::ToolError;
use super::preprocess::preprocess_input;
use crate::wrapper::{GitHubApiWrapper, Mode};

/// A named agent tool bound to one wrapper [`Mode`]
#[derive(Clone)]
pub struct GitHubAgentTool {
    name: String,
    description: String,
    mode: Mode,
    wrapper: Arc<GitHubApiWrapper>,
    callbacks: Option<Arc<dyn ToolCallbacks>>,
}

impl std::fmt::Debug for GitHubAgentTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAgentTool")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl GitHubAgentTool {
    pub fn new<N: Into<String>, D: Into<String>>(
        name: N,
        description: D,
        mode: Mode,
        wrapper: Arc<GitHubApiWrapper>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            mode,
            wrapper,
            callbacks: None,
        }
    }

    pub fn with_callbacks(mut self, callbacks: Arc<dyn ToolCallbacks>) -> Self {
        self.callbacks = Some(callbacks);
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

#[async_trait]
impl Tool for GitHubAgentTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn call(&self, input: &str) -> Result<String> {
        if let Some(callbacks) = &self.callbacks {
            callbacks.on_tool_start(&self.name, input);
        }

        let processed = preprocess_input(self.mode, input);
        match self.wrapper.run(self.mode, &processed).await {
            Ok(output) => {
                if let Some(callbacks) = &self.callbacks {
                    callbacks.on_tool_end(&self.name, &output);
                }
                Ok(output)
            }
            Err(e) => {
                let error = anyhow::Error::new(ToolError::OperationFailed(e));
                if let Some(callbacks) = &self.callbacks {
                    callbacks.on_tool_error(&self.name, &error);
                }
                Err(error)
            }
        }
    }
}
