use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Issue or pull request number; GitHub shares one sequence for both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct IssueNumber(pub u64);

impl IssueNumber {
    pub fn new(number: u64) -> Self {
        Self(number)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issue numbers start at 1
impl std::str::FromStr for IssueNumber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u64>() {
            Ok(0) => Err(format!("issue number must be positive: {}", s)),
            Ok(number) => Ok(Self(number)),
            Err(e) => Err(format!("invalid issue number {}: {}", s, e)),
        }
    }
}

/// `state` filter accepted by the issue listing endpoint
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    EnumString,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
    All,
}

/// Sort key for issue listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IssueSort {
    Created,
    Updated,
    Comments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_state_names() {
        assert_eq!(IssueState::default().as_ref(), "open");
        assert_eq!("closed".parse::<IssueState>().unwrap(), IssueState::Closed);
        assert_eq!(IssueState::All.to_string(), "all");
        assert!("pending".parse::<IssueState>().is_err());
    }

    #[test]
    fn test_issue_number_parse() {
        assert_eq!("42".parse::<IssueNumber>().unwrap(), IssueNumber::new(42));
        assert!("#42".parse::<IssueNumber>().is_err());
        assert!("0".parse::<IssueNumber>().is_err());
        assert!("000".parse::<IssueNumber>().is_err());
    }
}
