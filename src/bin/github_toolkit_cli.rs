use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use github_toolkit::config::WrapperConfig;
use github_toolkit::loaders::{
    CharacterTextSplitter, GitHubFileLoader, GitHubIssuesLoader, Loader, MilestoneFilter,
};
use github_toolkit::tools::{ToolkitOptions, preprocess_input, tool_catalog};
use github_toolkit::types::{Document, IssueSort, IssueState, SortDirection};
use github_toolkit::wrapper::{GitHubApiWrapper, Mode};

#[derive(Parser)]
#[command(name = "github-toolkit-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "GitHub Toolkit CLI - run repository operations and load issues or files as documents from the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Output format for results - text for reading, json for programmatic use
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,
    /// GitHub personal access token for the loaders (can also be set via GITHUB_PERSONAL_ACCESS_TOKEN)
    #[arg(long, global = true)]
    github_token: Option<String>,
    /// GitHub API root, e.g. for GitHub Enterprise (can also be set via GITHUB_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one wrapper mode against the repository configured through GITHUB_REPOSITORY, GITHUB_APP_ID and GITHUB_APP_PRIVATE_KEY
    Run {
        /// Mode name, e.g. get_issue, read_file, create_branch
        mode: Mode,
        /// Mode input; omit for modes that take none
        #[arg(default_value = "")]
        query: String,
        /// Optional TOML config file, values override the environment
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Branch to act on instead of the repository's default branch
        #[arg(long)]
        active_branch: Option<String>,
        /// Pass the query through without the agent-tool input clean-up
        #[arg(long)]
        raw: bool,
    },
    /// Load a repository's issues (and pull requests) as documents
    Issues {
        /// Repository in owner/repo form
        repository: String,
        /// Issue state filter
        #[arg(long, default_value = "open")]
        state: IssueState,
        /// Only issues carrying all of these labels (repeatable)
        #[arg(short, long)]
        label: Vec<String>,
        /// Milestone number, * for any or none for no milestone
        #[arg(long)]
        milestone: Option<MilestoneFilter>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        creator: Option<String>,
        #[arg(long)]
        mentioned: Option<String>,
        /// Sort field: created, updated or comments
        #[arg(long)]
        sort: Option<IssueSort>,
        /// Sort direction: asc or desc
        #[arg(long, default_value = "desc")]
        direction: SortDirection,
        /// Only issues updated at or after this RFC 3339 timestamp
        #[arg(long)]
        since: Option<DateTime<Utc>>,
        /// Drop pull requests from the result
        #[arg(long)]
        exclude_prs: bool,
        /// Fetch only this page (requires --per-page)
        #[arg(long, requires = "per_page")]
        page: Option<u32>,
        #[arg(long)]
        per_page: Option<u32>,
        /// Split documents into chunks of at most this many characters
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// Load every file of a branch as documents
    Files {
        /// Repository in owner/repo form
        repository: String,
        #[arg(short, long, default_value = "main")]
        branch: String,
        /// Only files with one of these extensions, e.g. rs or md (repeatable)
        #[arg(short, long)]
        extension: Vec<String>,
        /// Split documents into chunks of at most this many characters
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// List the agent tools with their modes and descriptions
    Tools {
        #[arg(long)]
        include_release_tools: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider early to prevent "no process-level CryptoProvider available" panics
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("github_toolkit=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api_url = cli
        .api_url
        .or_else(|| std::env::var(github_toolkit::config::ENV_API_URL).ok());

    match cli.command {
        Commands::Run {
            mode,
            query,
            config,
            active_branch,
            raw,
        } => {
            let file = match config {
                Some(path) => WrapperConfig::from_toml_file(&path)?,
                None => WrapperConfig::default(),
            };
            let flags = WrapperConfig {
                active_branch,
                api_base_url: api_url,
                ..Default::default()
            };
            let wrapper = GitHubApiWrapper::new(flags.merge(file).with_env_fallback()).await?;

            let query = if raw {
                query
            } else {
                preprocess_input(mode, &query)
            };
            let output = wrapper.run(mode, &query).await?;

            match cli.format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "mode": mode,
                        "output": output,
                    }))?
                ),
                OutputFormat::Text => println!("{}", output),
            }
        }
        Commands::Issues {
            repository,
            state,
            label,
            milestone,
            assignee,
            creator,
            mentioned,
            sort,
            direction,
            since,
            exclude_prs,
            page,
            per_page,
            chunk_size,
        } => {
            let mut loader = GitHubIssuesLoader::new(&repository, cli.github_token)?
                .with_state(state)
                .with_include_prs(!exclude_prs);
            if let Some(api_url) = api_url {
                loader = loader.with_api_base_url(api_url);
            }
            if !label.is_empty() {
                loader = loader.with_labels(label);
            }
            if let Some(milestone) = milestone {
                loader = loader.with_milestone(milestone);
            }
            if let Some(assignee) = assignee {
                loader = loader.with_assignee(assignee);
            }
            if let Some(creator) = creator {
                loader = loader.with_creator(creator);
            }
            if let Some(mentioned) = mentioned {
                loader = loader.with_mentioned(mentioned);
            }
            if let Some(sort) = sort {
                loader = loader.with_sort(sort, direction);
            }
            if let Some(since) = since {
                loader = loader.with_since(since);
            }
            if let Some(per_page) = per_page {
                loader = loader.with_pagination(page.unwrap_or(1), per_page);
            }

            let documents = load_documents(&loader, chunk_size).await?;
            print_documents(&documents, &cli.format)?;
        }
        Commands::Files {
            repository,
            branch,
            extension,
            chunk_size,
        } => {
            let mut loader =
                GitHubFileLoader::new(&repository, cli.github_token)?.with_branch(branch);
            if let Some(api_url) = api_url {
                loader = loader.with_api_base_url(api_url);
            }
            if !extension.is_empty() {
                let suffixes: Vec<String> = extension
                    .iter()
                    .map(|ext| format!(".{}", ext.trim_start_matches('.')))
                    .collect();
                loader = loader.with_filter(move |path| {
                    suffixes.iter().any(|suffix| path.ends_with(suffix.as_str()))
                });
            }

            let documents = load_documents(&loader, chunk_size).await?;
            print_documents(&documents, &cli.format)?;
        }
        Commands::Tools {
            include_release_tools,
        } => {
            let catalog = tool_catalog(ToolkitOptions {
                include_release_tools,
            });
            match cli.format {
                OutputFormat::Json => {
                    let tools: Vec<serde_json::Value> = catalog
                        .iter()
                        .map(|(name, description, mode)| {
                            serde_json::json!({
                                "name": name,
                                "mode": mode,
                                "description": description,
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&tools)?);
                }
                OutputFormat::Text => {
                    for (name, _, mode) in catalog {
                        println!("{:<45} {}", name, mode);
                    }
                }
            }
        }
    }

    Ok(())
}

async fn load_documents(loader: &dyn Loader, chunk_size: Option<usize>) -> Result<Vec<Document>> {
    match chunk_size {
        Some(size) => {
            let splitter = CharacterTextSplitter::new("\n\n", size, size / 10)
                .context("Invalid --chunk-size")?;
            loader.load_and_split(&splitter).await
        }
        None => loader.load().await,
    }
}

fn print_documents(documents: &[Document], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(documents)?),
        OutputFormat::Text => {
            for document in documents {
                for (key, value) in &document.metadata {
                    println!("{}: {}", key, serde_json::to_string(value)?);
                }
                println!();
                println!("{}", document.page_content);
                println!("---");
            }
            if documents.is_empty() {
                println!("No documents loaded.");
            }
        }
    }
    Ok(())
}
