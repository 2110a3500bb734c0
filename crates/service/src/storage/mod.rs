//! Storage abstractions for service layer
//!
//! File-backed stores for deployments that run without a database.

pub mod json_map_store;
