use std::sync::Arc;

use super::Tool;
use super::agent_tool::GitHubAgentTool;
use super::callbacks::ToolCallbacks;
use crate::wrapper::{GitHubApiWrapper, Mode};

struct ToolDefinition {
    name: &'static str,
    description: &'static str,
    mode: Mode,
}

const CORE_TOOLS: &[ToolDefinition] = &[
    ToolDefinition {
        name: "Get Issues",
        description: "This tool will fetch a list of the repository's issues. It will return the title, and issue number of 5 issues. It takes no input.",
        mode: Mode::GetIssues,
    },
    ToolDefinition {
        name: "Get Issue",
        description: "This tool will fetch the title, body, and comment thread of a specific issue. **VERY IMPORTANT**: You must specify the issue number as an integer.",
        mode: Mode::GetIssue,
    },
    ToolDefinition {
        name: "Comment on Issue",
        description: "This tool is useful when you need to comment on a GitHub issue. Simply pass in the issue number and the comment you would like to make. Please use this sparingly as we don't want to clutter the comment threads. **VERY IMPORTANT**: Your input to this tool MUST strictly follow these rules: - First you must specify the issue number as an integer - Then you must place two newlines - Then you must specify your comment",
        mode: Mode::CommentOnIssue,
    },
    ToolDefinition {
        name: "List open pull requests (PRs)",
        description: "This tool will fetch a list of the repository's Pull Requests (PRs). It will return the title, and PR number of 5 PRs. It takes no input.",
        mode: Mode::ListOpenPullRequests,
    },
    ToolDefinition {
        name: "Get Pull Request",
        description: "This tool will fetch the title, body, comment thread and commit history of a specific Pull Request (by PR number). **VERY IMPORTANT**: You must specify the PR number as an integer.",
        mode: Mode::GetPullRequest,
    },
    ToolDefinition {
        name: "Create Pull Request",
        description: "This tool is useful when you need to create a new pull request in a GitHub repository. **VERY IMPORTANT**: Your input to this tool MUST strictly follow these rules: - First you must specify the title of the pull request - Then you must place two newlines - Then you must write the body or description of the pull request When appropriate, always reference relevant issues in the body by using the syntax `closes #<issue_number` like `closes #3, closes #6`. For example, if you would like to create a pull request called \"README updates\" with contents \"added contributors' names, closes #3\", you would pass in the following string: README updates\n\nadded contributors' names, closes #3",
        mode: Mode::CreatePullRequest,
    },
    ToolDefinition {
        name: "List Pull Request Files",
        description: "This tool will fetch the full text of all files in a pull request (PR) given the PR number as an input. This is useful for understanding the code changes in a PR or contributing to it. **VERY IMPORTANT**: You must specify the PR number as an integer input parameter.",
        mode: Mode::ListPullRequestFiles,
    },
    ToolDefinition {
        name: "Create File",
        description: "This tool is a wrapper for the GitHub API, useful when you need to create a file in a GitHub repository. **VERY IMPORTANT**: Your input to this tool MUST strictly follow these rules: - First you must specify which file to create by passing a full file path (**IMPORTANT**: the path must not start with a slash) - Then you must specify the contents of the file For example, if you would like to create a file called /test/test.txt with contents \"test contents\", you would pass in the following string: test/test.txt\n\ntest contents",
        mode: Mode::CreateFile,
    },
    ToolDefinition {
        name: "Read File",
        description: "This tool is a wrapper for the GitHub API, useful when you need to read the contents of a file. Simply pass in the full file path of the file you would like to read. **IMPORTANT**: the path must not start with a slash",
        mode: Mode::ReadFile,
    },
    ToolDefinition {
        name: "Update File",
        description: "This tool is a wrapper for the GitHub API, useful when you need to update the contents of a file in a GitHub repository. **VERY IMPORTANT**: Your input to this tool MUST strictly follow these rules: - First you must specify which file to modify by passing a full file path (**IMPORTANT**: the path must not start with a slash) - Then you must specify the old contents which you would like to replace wrapped in OLD <<<< and >>>> OLD - Then you must specify the new contents which you would like to replace the old contents with wrapped in NEW <<<< and >>>> NEW For example, if you would like to replace the contents of the file /test/test.txt from \"old contents\" to \"new contents\", you would pass in the following string: test/test.txt\nThis is text that will not be changed\nOLD <<<<\nold contents\n>>>> OLD\nNEW <<<<\nnew contents\n>>>> NEW",
        mode: Mode::UpdateFile,
    },
    ToolDefinition {
        name: "Delete File",
        description: "This tool is a wrapper for the GitHub API, useful when you need to delete a file in a GitHub repository. Simply pass in the full file path of the file you would like to delete. **IMPORTANT**: the path must not start with a slash",
        mode: Mode::DeleteFile,
    },
    ToolDefinition {
        name: "Overview of existing files in Main branch",
        description: "This tool will provide an overview of all existing files in the main branch of the repository. It will list the file names, their respective paths, and a brief summary of their contents. This can be useful for understanding the structure and content of the repository, especially when navigating through large codebases. No input parameters are required.",
        mode: Mode::ListFilesInMainBranch,
    },
    ToolDefinition {
        name: "Overview of files in current working branch",
        description: "This tool will provide an overview of all files in your current working branch where you should implement changes. This is great for getting a high level overview of the structure of your code. No input parameters are required.",
        mode: Mode::ListFilesInBotBranch,
    },
    ToolDefinition {
        name: "List branches in this repository",
        description: "This tool will fetch a list of all branches in the repository. It will return the name of each branch. No input parameters are required.",
        mode: Mode::ListBranchesInRepo,
    },
    ToolDefinition {
        name: "Set active branch",
        description: "This tool will set the active branch in the repository, similar to `git checkout <branch_name>` and `git switch -c <branch_name>`. **VERY IMPORTANT**: You must specify the name of the branch as a string input parameter.",
        mode: Mode::SetActiveBranch,
    },
    ToolDefinition {
        name: "Create a new branch",
        description: "This tool will create a new branch in the repository. **VERY IMPORTANT**: You must specify the name of the new branch as a string input parameter.",
        mode: Mode::CreateBranch,
    },
    ToolDefinition {
        name: "Get files from a directory",
        description: "This tool will fetch a list of all files in a specified directory. **VERY IMPORTANT**: You must specify the path of the directory as a string input parameter.",
        mode: Mode::GetFilesFromDirectory,
    },
    ToolDefinition {
        name: "Search issues and pull requests",
        description: "Searches issues and pull requests in the repository. **VERY IMPORTANT**: You must specify the search query as a string input parameter.",
        mode: Mode::SearchIssuesAndPrs,
    },
    ToolDefinition {
        name: "Search code",
        description: "This tool will search for code in the repository. **VERY IMPORTANT**: You must specify the search query as a string input parameter.",
        mode: Mode::SearchCode,
    },
];

const RELEASE_TOOLS: &[ToolDefinition] = &[
    ToolDefinition {
        name: "Get latest release",
        description: "This tool will fetch the latest release of the repository. No input parameters are required.",
        mode: Mode::GetLatestRelease,
    },
    ToolDefinition {
        name: "Get releases",
        description: "This tool will fetch the latest 5 releases of the repository. No input parameters are required.",
        mode: Mode::GetReleases,
    },
    ToolDefinition {
        name: "Get release",
        description: "This tool will fetch a specific release of the repository. **VERY IMPORTANT**: You must specify the tag name of the release as a string input parameter.",
        mode: Mode::GetRelease,
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolkitOptions {
    pub include_release_tools: bool,
}

fn definitions(options: ToolkitOptions) -> impl Iterator<Item = &'static ToolDefinition> {
    let release_tools: &'static [ToolDefinition] = if options.include_release_tools {
        RELEASE_TOOLS
    } else {
        &[]
    };
    CORE_TOOLS.iter().chain(release_tools)
}

/// `(name, description, mode)` of every tool a toolkit built with `options` registers
pub fn tool_catalog(options: ToolkitOptions) -> Vec<(&'static str, &'static str, Mode)> {
    definitions(options)
        .map(|definition| (definition.name, definition.description, definition.mode))
        .collect()
}

/// The full set of GitHub agent tools sharing one wrapper
#[derive(Debug, Clone)]
pub struct GitHubAgentToolkit {
    tools: Vec<Arc<GitHubAgentTool>>,
    include_release_tools: bool,
}

impl GitHubAgentToolkit {
    pub fn new(wrapper: Arc<GitHubApiWrapper>, options: ToolkitOptions) -> Self {
        Self::build(wrapper, options, None)
    }

    pub fn from_wrapper(wrapper: Arc<GitHubApiWrapper>, include_release_tools: bool) -> Self {
        Self::new(
            wrapper,
            ToolkitOptions {
                include_release_tools,
            },
        )
    }

    /// Same tool set, every tool reporting to `callbacks`
    pub fn with_callbacks(
        wrapper: Arc<GitHubApiWrapper>,
        options: ToolkitOptions,
        callbacks: Arc<dyn ToolCallbacks>,
    ) -> Self {
        Self::build(wrapper, options, Some(callbacks))
    }

    fn build(
        wrapper: Arc<GitHubApiWrapper>,
        options: ToolkitOptions,
        callbacks: Option<Arc<dyn ToolCallbacks>>,
    ) -> Self {
        let tools = definitions(options)
            .map(|definition| {
                let tool = GitHubAgentTool::new(
                    definition.name,
                    definition.description,
                    definition.mode,
                    Arc::clone(&wrapper),
                );
                let tool = match &callbacks {
                    Some(callbacks) => tool.with_callbacks(Arc::clone(callbacks)),
                    None => tool,
                };
                Arc::new(tool)
            })
            .collect();

        Self {
            tools,
            include_release_tools: options.include_release_tools,
        }
    }

    pub fn include_release_tools(&self) -> bool {
        self.include_release_tools
    }

    /// Every tool as a trait object, in registration order
    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools
            .iter()
            .map(|tool| Arc::clone(tool) as Arc<dyn Tool>)
            .collect()
    }

    pub fn agent_tools(&self) -> &[Arc<GitHubAgentTool>] {
        &self.tools
    }

    pub fn tool_by_name(&self, name: &str) -> Option<Arc<GitHubAgentTool>> {
        self.tools.iter().find(|tool| tool.name() == name).cloned()
    }

    /// Lookup by display name, falling back to the mode name (`get_issue`)
    pub fn tool_by_name_or_mode(&self, name: &str) -> Option<Arc<GitHubAgentTool>> {
        self.tool_by_name(name).or_else(|| {
            let mode = name.parse::<Mode>().ok()?;
            self.tools.iter().find(|tool| tool.mode() == mode).cloned()
        })
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }
}
