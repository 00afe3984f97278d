//! Normalisation of free-text agent input before it reaches the wrapper

use once_cell::sync::Lazy;
use regex::Regex;

use crate::wrapper::Mode;

static INTEGER_TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+\b").expect("Failed to compile integer token regex"));

/// Clean up agent input for `mode`.
///
/// - input is always trimmed
/// - number modes keep only the first integer found, so `"issue #42"` becomes `"42"`
/// - comment and PR payloads get exactly one blank line after their first line
/// - everything else passes through
pub fn preprocess_input(mode: Mode, input: &str) -> String {
    let input = input.trim();

    match mode {
        m if m.takes_number() => first_integer(input).unwrap_or_else(|| input.to_string()),
        Mode::CommentOnIssue | Mode::CreatePullRequest => match input.split_once('\n') {
            Some((head, rest)) => format!("{}\n\n{}", head.trim(), rest.trim()),
            None => input.to_string(),
        },
        _ => input.to_string(),
    }
}

fn first_integer(input: &str) -> Option<String> {
    if let Ok(number) = input.parse::<i64>() {
        return Some(number.to_string());
    }
    INTEGER_TOKEN_REGEX
        .find(input)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .map(|number| number.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_modes() {
        assert_eq!(preprocess_input(Mode::GetIssue, "  456  "), "456");
        assert_eq!(preprocess_input(Mode::GetIssue, "+7"), "7");
        assert_eq!(preprocess_input(Mode::GetPullRequest, "PR 12 please"), "12");
        assert_eq!(preprocess_input(Mode::GetIssue, "issue #42"), "42");
        assert_eq!(preprocess_input(Mode::ListPullRequestFiles, "0012"), "12");
        assert_eq!(preprocess_input(Mode::GetIssue, "no digits"), "no digits");
    }

    #[test]
    fn test_two_part_modes() {
        assert_eq!(
            preprocess_input(Mode::CommentOnIssue, "42\nThis is a comment"),
            "42\n\nThis is a comment"
        );
        assert_eq!(
            preprocess_input(Mode::CreatePullRequest, "  Title  \n\n\n  Body text\n"),
            "Title\n\nBody text"
        );
        assert_eq!(preprocess_input(Mode::CommentOnIssue, "42"), "42");
    }

    #[test]
    fn test_file_modes_only_trimmed() {
        let update = "a.txt\nOLD <<<<\n  x\n>>>> OLD\nNEW <<<<\ny\n>>>> NEW";
        assert_eq!(preprocess_input(Mode::UpdateFile, &format!("\n{}\n", update)), update);
        assert_eq!(
            preprocess_input(Mode::CreateFile, "src/a.rs\n\nfn a() {}"),
            "src/a.rs\n\nfn a() {}"
        );
    }
}
