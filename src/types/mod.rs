//! Core type definitions shared by the wrapper, the tools and the loaders

pub mod document;
pub mod issue;
pub mod repository;

pub use document::*;
pub use issue::*;
pub use repository::*;
