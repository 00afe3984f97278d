//! Plain-text and JSON reports returned by the wrapper operations

pub mod files;
pub mod issue;
pub mod pull_request;
pub mod release;
pub mod search;

pub use files::*;
pub use issue::{issue_detail_json, issue_list_report};
pub use pull_request::*;
pub use release::*;
pub use search::*;
