//! Database module
//!
//! SQLite persistence for the profile and the food, weight and workout logs.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
