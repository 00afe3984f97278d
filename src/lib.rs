//! GitHub REST API wrappers for LLM agents
//!
//! - [`wrapper`]: repository-scoped operations dispatched by [`wrapper::Mode`]
//! - [`tools`]: those operations as named agent tools, plus an MCP server
//! - [`loaders`]: issues and repository files as documents

/// Construction-time configuration and environment lookup
pub mod config;

/// Text reports returned to the agent
pub mod formatter;

/// REST client, error mapping and `Link` pagination
pub mod github;

/// Document loaders for issues and repository files
pub mod loaders;

/// Agent tools and the MCP server exposing them
pub mod tools;

/// Transport layer implementations for MCP server modes (stdio, SSE)
pub mod transport;

/// Core type definitions shared across the crate
pub mod types;

/// Mode dispatcher over the GitHub REST API
pub mod wrapper;
