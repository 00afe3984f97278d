use crate::types::Branch;

pub fn main_branch_listing_report(files: &[String]) -> String {
    if files.is_empty() {
        return "No files found in the main branch".to_string();
    }
    format!(
        "Found {} files in the main branch:\n{}",
        files.len(),
        files.join("\n")
    )
}

pub fn branch_listing_report(branch: &Branch, files: &[String]) -> String {
    if files.is_empty() {
        return format!("No files found in branch: `{}`", branch);
    }
    format!(
        "Found {} files in branch `{}`:\n{}",
        files.len(),
        branch,
        files.join("\n")
    )
}

pub fn branch_names_report(names: &[String]) -> String {
    if names.is_empty() {
        return "No branches found in the repository".to_string();
    }
    format!(
        "Found {} branches in the repository:\n{}",
        names.len(),
        names.join("\n")
    )
}

/// Refusal text for writes aimed at the protected base branch
pub fn protected_branch_report(base: &Branch) -> String {
    format!(
        "You're attempting to commit to the directly to the {} branch, which is protected. Please create a new branch and try again.",
        base
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_reports() {
        let files = vec!["README.md".to_string(), "src/lib.rs".to_string()];
        assert_eq!(
            main_branch_listing_report(&files),
            "Found 2 files in the main branch:\nREADME.md\nsrc/lib.rs"
        );
        assert_eq!(
            branch_listing_report(&Branch::new("bot"), &[]),
            "No files found in branch: `bot`"
        );
        assert_eq!(
            branch_names_report(&["main".to_string()]),
            "Found 1 branches in the repository:\nmain"
        );
    }
}
