//! Jira Activity - a report of what one user did in the issue tracker over a
//! time window.
//!
//! # Overview
//!
//! The current user is resolved from the tracker credentials, issues touched
//! in the window are searched, and each issue's comments and change history
//! are filtered to the window (changes also to the user). The resulting
//! [`model::ActivityReport`] is rendered as XML, JSON, Markdown or HTML.
//!
//! # Modules
//!
//! - [`model`]: Domain types for users, issues, comments and changes
//! - [`config`]: Settings and environment configuration
//! - [`query`]: Search query construction
//! - [`data_sources`]: Tracker REST client
//! - [`extract`]: Raw tracker payloads to domain types
//! - [`aggregation`]: Bounded parallel fan-out used by extraction
//! - [`repository`]: Repository trait and tracker-backed implementation
//! - [`service`]: Report assembly
//! - [`format`]: Output formatters
//! - [`api`]: HTTP API handlers
//! - [`error`]: Error types

pub mod aggregation;
pub mod api;
pub mod config;
pub mod data_sources;
pub mod error;
pub mod extract;
pub mod format;
pub mod model;
pub mod query;
pub mod repository;
pub mod service;
