use std::net::SocketAddr;

use anyhow::{Context, Result};
use rmcp::transport::sse_server::SseServer;

use super::build_tool_server;
use crate::config::WrapperConfig;
use crate::tools::ToolkitOptions;

/// HTTP/SSE front end for the tool server
pub struct SseServerApp {
    bind_addr: SocketAddr,
    config: WrapperConfig,
    options: ToolkitOptions,
}

impl SseServerApp {
    pub fn new(bind_addr: SocketAddr, config: WrapperConfig, options: ToolkitOptions) -> Self {
        Self {
            bind_addr,
            config,
            options,
        }
    }

    /// Connect to GitHub, bind `bind_addr` and serve until Ctrl+C.
    ///
    /// All sessions share one wrapper, so a branch switched in one session is
    /// the active branch for every other session too.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is incomplete, the repository cannot be
    /// reached, or the address cannot be bound.
    pub async fn serve(self) -> Result<()> {
        let tool_server = build_tool_server(self.config, self.options).await?;

        let sse_server = SseServer::serve(self.bind_addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.bind_addr))?;
        let shutdown = sse_server.with_service(move || tool_server.clone());

        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutting down SSE server");
        shutdown.cancel();

        Ok(())
    }
}
