pub mod dataset;
pub mod error;
pub mod mcp_api;
pub mod model;
pub mod redis;
pub mod render;
pub mod search;
pub mod snippet;
pub mod terms;
