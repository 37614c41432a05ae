//! NutriFit Library
//!
//! Fitness and nutrition metrics engine with SQLite-backed logs and an MCP
//! tool surface.

pub mod build_info;
pub mod config;
pub mod context;
pub mod db;
pub mod format;
pub mod mcp;
pub mod metrics;
pub mod models;
pub mod tools;
