use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{self, layer::SubscriberExt, util::SubscriberInitExt};

use github_toolkit::config::WrapperConfig;
use github_toolkit::tools::ToolkitOptions;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "GitHub Toolkit MCP Server - Model Context Protocol server exposing repository-scoped GitHub tools"
)]
#[command(
    long_about = "GitHub Toolkit MCP Server exposes one GitHub repository to MCP clients as a set of agent tools: issue and pull request lookup, commenting, branch management, file creation and editing on a working branch, code and issue search, and optionally releases. Supports both stdio and HTTP/SSE interfaces."
)]
#[command(propagate_version = true)]
#[command(disable_version_flag = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Settings shared by both transports. Flags override the config file, which
/// overrides the GITHUB_* environment variables.
#[derive(Args, Clone)]
struct ServerArgs {
    /// Enable debug logging for troubleshooting and development
    #[arg(short, long)]
    debug: bool,

    /// TOML file with repository, app_id, private_key, active_branch, base_branch, api_base_url and timeout_secs
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Repository in owner/repo form (overrides GITHUB_REPOSITORY)
    #[arg(short, long)]
    repository: Option<String>,

    /// GitHub App id (overrides GITHUB_APP_ID)
    #[arg(long)]
    app_id: Option<String>,

    /// Branch to start working on instead of the repository's default branch
    #[arg(long)]
    active_branch: Option<String>,

    /// Branch pull requests target and file writes are refused on
    #[arg(long)]
    base_branch: Option<String>,

    /// Register the release tools (latest release, releases, release by tag)
    #[arg(long)]
    include_release_tools: bool,
}

impl ServerArgs {
    fn wrapper_config(&self) -> Result<WrapperConfig> {
        let flags = WrapperConfig {
            repository: self.repository.clone(),
            app_id: self.app_id.clone(),
            active_branch: self.active_branch.clone(),
            base_branch: self.base_branch.clone(),
            ..Default::default()
        };
        let file = match &self.config {
            Some(path) => WrapperConfig::from_toml_file(path)?,
            None => WrapperConfig::default(),
        };
        Ok(flags.merge(file).with_env_fallback())
    }

    fn toolkit_options(&self) -> ToolkitOptions {
        ToolkitOptions {
            include_release_tools: self.include_release_tools,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server in stdin/stdout mode for MCP client integration like Claude Desktop
    Stdio {
        #[command(flatten)]
        server: ServerArgs,
    },
    /// Run the server with HTTP/SSE interface for web-based access and testing
    Http {
        /// Address to bind the HTTP server to for web interface access
        #[arg(short, long, default_value = "0.0.0.0:8080")]
        address: String,

        #[command(flatten)]
        server: ServerArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider early to prevent "no process-level CryptoProvider available" panics
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();

    match cli.command {
        Commands::Stdio { server } => {
            init_tracing(server.debug);
            github_toolkit::transport::stdio::run_stdio_server(
                server.wrapper_config()?,
                server.toolkit_options(),
            )
            .await
        }
        Commands::Http { address, server } => run_http_server(address, server).await,
    }
}

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    // stdout carries the MCP stream, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},{}", level, env!("CARGO_CRATE_NAME")).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn run_http_server(address: String, server: ServerArgs) -> Result<()> {
    init_tracing(server.debug);

    // Parse socket address
    let addr: SocketAddr = address.parse()?;

    tracing::info!("Access the GitHub Toolkit MCP server at http://{}/sse", addr);

    let app = github_toolkit::transport::sse_server::SseServerApp::new(
        addr,
        server.wrapper_config()?,
        server.toolkit_options(),
    );
    app.serve().await?;

    Ok(())
}
