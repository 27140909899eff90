//! Domain model for activity reports.
//!
//! These types are independent of both the tracker's wire format and the
//! output formats. Every instant is normalized to UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The activity window `[start, end)`.
///
/// `start <= end` is the caller's responsibility; an inverted range simply
/// contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Start-inclusive, end-exclusive membership test.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start && t < self.end
    }
}

/// A tracker user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Actor key used for change attribution.
    pub account_id: String,
    pub display_name: String,
    pub email: String,
}

/// A comment left on an issue inside the activity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub timestamp: DateTime<Utc>,
    /// Display name of the comment author.
    pub author: String,
    pub content: String,
}

/// A single field change made by the report's user inside the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub timestamp: DateTime<Utc>,
    pub author: String,
    pub field: String,
    pub from_value: String,
    pub to_value: String,
}

/// An issue with its already time-filtered activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub comments: Vec<Comment>,
    pub changes: Vec<Change>,
}

impl Issue {
    /// Whether any comment or change survived window filtering.
    pub fn has_activity(&self) -> bool {
        !self.comments.is_empty() || !self.changes.is_empty()
    }
}

/// Root value produced per report request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityReport {
    pub time_range: TimeRange,
    pub user: User,
    pub issues: Vec<Issue>,
}

/// Options used to build the tracker search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Query template with three `%s` placeholders: project, from, to.
    pub filter_template: String,

    /// Restrict to issues assigned to the authenticated user.
    pub assignee_is_current_user: bool,

    /// Project key substituted into the template.
    pub project: String,

    /// Status clause operand, e.g. `"!= Closed"` or `"= In Progress"`.
    pub status_filter: String,

    /// Restrict to issues in open sprints.
    pub in_open_sprints_only: bool,

    pub max_results: u32,

    /// Fields requested from the search endpoint.
    pub fields: Vec<String>,

    /// Ask the tracker to inline each issue's change history.
    pub expand_history: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            filter_template: "project = %s AND updatedDate >= %s AND updatedDate < %s".to_string(),
            assignee_is_current_user: true,
            project: String::new(),
            status_filter: "!= Closed".to_string(),
            in_open_sprints_only: true,
            max_results: 100,
            fields: ["summary", "description", "status", "changelog", "comment"]
                .iter()
                .map(|f| f.to_string())
                .collect(),
            expand_history: true,
        }
    }
}
