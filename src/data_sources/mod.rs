//! External issue tracker clients.
//!
//! # Data Sources
//!
//! - [`jira`]: Jira REST API v2 - current user and JQL issue search

pub mod jira;

pub use jira::{JiraClient, SearchOptions};
