pub mod client;
pub mod error;
pub mod pagination;
pub mod rest_types;

pub use client::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT, GitHubClient};
pub use error::ApiError;
pub use pagination::{PageRequest, parse_next_link};
