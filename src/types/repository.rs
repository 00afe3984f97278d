//! Repository identity and branch names

use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

static OWNER_REPO_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^/\s]+)/([^/\s]+)$").expect("Failed to compile owner/repo regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Branch(pub String);

impl Branch {
    pub fn new<T: Into<String>>(branch: T) -> Self {
        Self(branch.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Branch {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Branch {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Owner name wrapper for type safety
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, PartialOrd, Ord,
)]
pub struct Owner(pub String);

impl Owner {
    pub fn new(owner: String) -> Self {
        Self(owner)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Repository name wrapper for type safety
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, PartialOrd, Ord,
)]
pub struct RepositoryName(pub String);

impl RepositoryName {
    pub fn new(repo_name: String) -> Self {
        Self(repo_name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A repository reference in `owner/name` form.
///
/// Immutable once constructed; every API path for the repository is derived
/// from it.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, PartialOrd, Ord,
)]
pub struct RepositoryId {
    pub owner: Owner,
    pub repository_name: RepositoryName,
}

impl RepositoryId {
    pub fn new<T1: Into<String>, T2: Into<String>>(owner: T1, name: T2) -> Self {
        Self {
            owner: Owner::new(owner.into()),
            repository_name: RepositoryName::new(name.into()),
        }
    }

    /// Parse an `owner/repo` string.
    ///
    /// Exactly one `/` is allowed and both halves must be non-empty.
    pub fn parse(input: &str) -> Result<Self, String> {
        let captures = OWNER_REPO_REGEX
            .captures(input.trim())
            .ok_or_else(|| format!("invalid repository format: {} (expected owner/repo)", input))?;
        Ok(Self::new(&captures[1], &captures[2]))
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn repo_name(&self) -> &RepositoryName {
        &self.repository_name
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repository_name)
    }

    /// REST path prefix, `repos/{owner}/{name}`
    pub fn api_path(&self) -> String {
        format!(
            "repos/{}/{}",
            urlencoding::encode(self.owner.as_str()),
            urlencoding::encode(self.repository_name.as_str())
        )
    }
}

impl std::fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repository_name)
    }
}

impl std::str::FromStr for RepositoryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_owner_repo() {
        let id = RepositoryId::parse("tmc/langchaingo").unwrap();
        assert_eq!(id.owner().as_str(), "tmc");
        assert_eq!(id.repo_name().as_str(), "langchaingo");
        assert_eq!(id.full_name(), "tmc/langchaingo");
        assert_eq!(id.api_path(), "repos/tmc/langchaingo");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "owner", "owner/", "/repo", "a/b/c", "own er/repo"] {
            let err = RepositoryId::parse(input).unwrap_err();
            assert!(err.contains("expected owner/repo"), "{}", input);
        }
    }
}
