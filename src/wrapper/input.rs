//! Payload grammars for the multi-field modes
//!
//! Hard failures ([`WrapperError`]) abort a `run` call before any request is
//! made. Soft failures ([`PayloadError`]) are reported back to the caller as
//! the operation's result text.

use crate::types::IssueNumber;

const OLD_START: &str = "OLD <<<<";
const OLD_END: &str = ">>>> OLD";
const NEW_START: &str = "NEW <<<<";
const NEW_END: &str = ">>>> NEW";

/// Input errors that fail a `run` call
#[derive(Debug, Clone, PartialEq)]
pub enum WrapperError {
    InvalidMode(String),
    InvalidIssueNumber(String),
    InvalidPullRequestNumber(String),
}

impl std::fmt::Display for WrapperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMode(mode) => write!(f, "invalid mode: {}", mode),
            Self::InvalidIssueNumber(input) => write!(f, "invalid issue number: {}", input),
            Self::InvalidPullRequestNumber(input) => write!(f, "invalid PR number: {}", input),
        }
    }
}

impl std::error::Error for WrapperError {}

/// Malformed payloads, reported as result text
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadError {
    InvalidCommentFormat,
    InvalidIssueNumber(String),
    InvalidFileFormat,
    MissingUpdateMarkers,
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCommentFormat => write!(f, "Invalid comment format"),
            Self::InvalidIssueNumber(input) => write!(f, "Invalid issue number: {}", input),
            Self::InvalidFileFormat => write!(f, "Invalid file format"),
            Self::MissingUpdateMarkers => write!(
                f,
                "Invalid update format: missing {} ... {} or {} ... {} markers",
                OLD_START, OLD_END, NEW_START, NEW_END
            ),
        }
    }
}

impl std::error::Error for PayloadError {}

/// Repository paths never start with a slash
pub fn normalize_path(path: &str) -> &str {
    path.trim().trim_start_matches('/')
}

/// `"<issue number>\n\n<comment>"`
#[derive(Debug, Clone, PartialEq)]
pub struct CommentPayload {
    pub issue_number: IssueNumber,
    pub comment: String,
}

impl CommentPayload {
    pub fn parse(query: &str) -> Result<Self, PayloadError> {
        let (number, comment) = query
            .split_once("\n\n")
            .ok_or(PayloadError::InvalidCommentFormat)?;
        let issue_number = number
            .parse::<IssueNumber>()
            .map_err(|_| PayloadError::InvalidIssueNumber(number.to_string()))?;
        Ok(Self {
            issue_number,
            comment: comment.to_string(),
        })
    }
}

/// `"<title>\n\n<body>"`; a missing body becomes empty
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestPayload {
    pub title: String,
    pub body: String,
}

impl PullRequestPayload {
    pub fn parse(query: &str) -> Self {
        let (title, body) = match query.split_once("\n\n") {
            Some((title, body)) => (title, body),
            None => query.split_once('\n').unwrap_or((query, "")),
        };
        Self {
            title: title.to_string(),
            body: body.to_string(),
        }
    }
}

/// `"<path>\n<contents>"`
#[derive(Debug, Clone, PartialEq)]
pub struct NewFilePayload {
    pub path: String,
    pub contents: String,
}

impl NewFilePayload {
    pub fn parse(query: &str) -> Result<Self, PayloadError> {
        let (path, contents) = query
            .split_once('\n')
            .ok_or(PayloadError::InvalidFileFormat)?;
        Ok(Self {
            path: normalize_path(path).to_string(),
            contents: contents.to_string(),
        })
    }
}

/// Path line followed by `OLD <<<< … >>>> OLD` and `NEW <<<< … >>>> NEW` blocks.
///
/// Both blocks are whitespace-trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpdatePayload {
    pub path: String,
    pub old_content: String,
    pub new_content: String,
}

fn marked_block<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = text.find(start)? + start.len();
    let to = text.find(end)?;
    text.get(from..to)
}

impl FileUpdatePayload {
    pub fn parse(query: &str) -> Result<Self, PayloadError> {
        let (path, rest) = query.split_once('\n').unwrap_or((query, ""));
        let old_content = marked_block(rest, OLD_START, OLD_END);
        let new_content = marked_block(rest, NEW_START, NEW_END);

        match (old_content, new_content) {
            (Some(old_content), Some(new_content)) => Ok(Self {
                path: normalize_path(path).to_string(),
                old_content: old_content.trim().to_string(),
                new_content: new_content.trim().to_string(),
            }),
            _ => Err(PayloadError::MissingUpdateMarkers),
        }
    }

    /// Replace every occurrence of the old block; `None` when nothing matched
    pub fn apply(&self, current: &str) -> Option<String> {
        if self.old_content.is_empty() || !current.contains(&self.old_content) {
            return None;
        }
        let updated = current.replace(&self.old_content, &self.new_content);
        (updated != current).then_some(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_payload() {
        let payload = CommentPayload::parse("42\n\nThis is a comment\n\nwith paragraphs").unwrap();
        assert_eq!(payload.issue_number, IssueNumber::new(42));
        assert_eq!(payload.comment, "This is a comment\n\nwith paragraphs");

        assert_eq!(
            CommentPayload::parse("42\nno blank line").unwrap_err(),
            PayloadError::InvalidCommentFormat
        );
        assert_eq!(
            CommentPayload::parse("abc\n\ncomment").unwrap_err().to_string(),
            "Invalid issue number: abc"
        );
    }

    #[test]
    fn test_pull_request_payload() {
        let payload = PullRequestPayload::parse("README updates\n\nadded names, closes #3");
        assert_eq!(payload.title, "README updates");
        assert_eq!(payload.body, "added names, closes #3");

        let title_only = PullRequestPayload::parse("Just a title");
        assert_eq!(title_only.title, "Just a title");
        assert_eq!(title_only.body, "");
    }

    #[test]
    fn test_new_file_payload() {
        let payload = NewFilePayload::parse("/test/test.txt\ntest contents\nline two").unwrap();
        assert_eq!(payload.path, "test/test.txt");
        assert_eq!(payload.contents, "test contents\nline two");
        assert_eq!(
            NewFilePayload::parse("only-a-path").unwrap_err(),
            PayloadError::InvalidFileFormat
        );
    }

    #[test]
    fn test_update_payload_markers() {
        let query = "test/test.txt\nThis is text that will not be changed\nOLD <<<<\nold contents\n>>>> OLD\nNEW <<<<\nnew contents\n>>>> NEW";
        let payload = FileUpdatePayload::parse(query).unwrap();
        assert_eq!(payload.path, "test/test.txt");
        assert_eq!(payload.old_content, "old contents");
        assert_eq!(payload.new_content, "new contents");

        let missing = FileUpdatePayload::parse("a.txt\nOLD <<<<\nx\n>>>> OLD").unwrap_err();
        assert!(missing.to_string().starts_with("Invalid update format"));

        // end marker before start marker
        let reversed = FileUpdatePayload::parse("a.txt\n>>>> OLD x OLD <<<<\nNEW <<<<y>>>> NEW");
        assert_eq!(reversed.unwrap_err(), PayloadError::MissingUpdateMarkers);
    }

    #[test]
    fn test_update_apply_replaces_all_or_reports_noop() {
        let payload = FileUpdatePayload {
            path: "a.txt".to_string(),
            old_content: "foo".to_string(),
            new_content: "bar".to_string(),
        };
        assert_eq!(payload.apply("foo and foo").as_deref(), Some("bar and bar"));
        assert_eq!(payload.apply("nothing here"), None);
    }

    #[test]
    fn test_wrapper_error_messages() {
        assert_eq!(
            WrapperError::InvalidMode("bogus".to_string()).to_string(),
            "invalid mode: bogus"
        );
        assert_eq!(
            WrapperError::InvalidPullRequestNumber("x".to_string()).to_string(),
            "invalid PR number: x"
        );
    }
}
