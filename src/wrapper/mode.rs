use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Operation selected by a [`super::GitHubApiWrapper::run`] call.
///
/// The string form is the snake_case name used by tool configurations, e.g.
/// `get_issue` or `list_files_in_bot_branch`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    EnumString,
    Display,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    GetIssues,
    GetIssue,
    CommentOnIssue,
    ListOpenPullRequests,
    GetPullRequest,
    CreatePullRequest,
    ListPullRequestFiles,
    CreateFile,
    ReadFile,
    UpdateFile,
    DeleteFile,
    ListFilesInMainBranch,
    ListFilesInBotBranch,
    ListBranchesInRepo,
    SetActiveBranch,
    CreateBranch,
    GetFilesFromDirectory,
    SearchIssuesAndPrs,
    SearchCode,
    GetLatestRelease,
    GetReleases,
    GetRelease,
}

impl Mode {
    /// Modes whose payload is a single issue or pull request number
    pub fn takes_number(&self) -> bool {
        matches!(
            self,
            Self::GetIssue | Self::GetPullRequest | Self::ListPullRequestFiles
        )
    }

    /// Modes that commit to the active branch and are refused on the base branch
    pub fn writes_files(&self) -> bool {
        matches!(self, Self::CreateFile | Self::UpdateFile | Self::DeleteFile)
    }

    pub fn is_release_mode(&self) -> bool {
        matches!(
            self,
            Self::GetLatestRelease | Self::GetReleases | Self::GetRelease
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_mode_names_round_trip() {
        assert_eq!(Mode::SearchIssuesAndPrs.as_ref(), "search_issues_and_prs");
        assert_eq!(Mode::ListFilesInBotBranch.to_string(), "list_files_in_bot_branch");
        assert_eq!("get_issue".parse::<Mode>().unwrap(), Mode::GetIssue);
        assert!("get_issue_comments".parse::<Mode>().is_err());

        for mode in Mode::iter() {
            assert_eq!(mode.as_ref().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_mode_count() {
        assert_eq!(Mode::iter().count(), 22);
        assert_eq!(Mode::iter().filter(Mode::is_release_mode).count(), 3);
    }
}
