use crate::github::rest_types::RestSearchIssues;

/// Number of hits kept from either search endpoint
pub const SEARCH_RESULT_LIMIT: usize = 5;

pub fn issue_search_report(result: &RestSearchIssues) -> String {
    if result.total_count == 0 {
        return "0 results found.".to_string();
    }

    let shown = SEARCH_RESULT_LIMIT.min(result.total_count as usize);
    let mut lines = vec![format!("Top {} results:", shown)];
    lines.extend(result.items.iter().take(shown).map(|issue| {
        format!(
            "Title: {}, Number: {}, State: {}",
            issue.title, issue.number, issue.state
        )
    }));
    lines.join("\n")
}

/// Code search hits paired with the file contents read for each path
pub fn code_search_report(total_count: u64, files: &[(String, String)]) -> String {
    if total_count == 0 {
        return "0 results found.".to_string();
    }

    let shown = SEARCH_RESULT_LIMIT.min(total_count as usize);
    let mut lines = vec![format!("Showing top {} of {} results:", shown, total_count)];
    lines.extend(files.iter().take(shown).map(|(path, contents)| {
        format!(
            "Filepath: `{}`\nFile contents: {}\n<END OF FILE>",
            path, contents
        )
    }));
    lines.join("\n")
}
