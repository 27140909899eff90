//! Structured-data (JSON) formatter.
//!
//! The user's account id is intentionally left out of the document.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::{ActivityError, Result};
use crate::model::ActivityReport;

pub const CONTENT_TYPE: &str = "application/json";

/// Exact output for a report without issues.
pub const EMPTY: &str = "{}";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    time_range: JsonTimeRange,
    user: JsonUser<'a>,
    issues: Vec<JsonIssue<'a>>,
}

#[derive(Serialize)]
struct JsonTimeRange {
    start: String,
    end: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonUser<'a> {
    display_name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct JsonIssue<'a> {
    key: &'a str,
    status: &'a str,
    summary: &'a str,
    comments: Vec<JsonComment<'a>>,
    changes: Vec<JsonChange<'a>>,
}

#[derive(Serialize)]
struct JsonComment<'a> {
    timestamp: String,
    author: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct JsonChange<'a> {
    timestamp: String,
    author: &'a str,
    field: &'a str,
    from: &'a str,
    to: &'a str,
}

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Render `report` as pretty-printed JSON.
pub fn render(report: &ActivityReport) -> Result<String> {
    if report.issues.is_empty() {
        return Ok(EMPTY.to_string());
    }

    let document = JsonReport {
        time_range: JsonTimeRange {
            start: rfc3339(report.time_range.start),
            end: rfc3339(report.time_range.end),
        },
        user: JsonUser {
            display_name: &report.user.display_name,
            email: &report.user.email,
        },
        issues: report
            .issues
            .iter()
            .map(|issue| JsonIssue {
                key: &issue.key,
                status: &issue.status,
                summary: &issue.summary,
                comments: issue
                    .comments
                    .iter()
                    .map(|c| JsonComment {
                        timestamp: rfc3339(c.timestamp),
                        author: &c.author,
                        content: &c.content,
                    })
                    .collect(),
                changes: issue
                    .changes
                    .iter()
                    .map(|c| JsonChange {
                        timestamp: rfc3339(c.timestamp),
                        author: &c.author,
                        field: &c.field,
                        from: &c.from_value,
                        to: &c.to_value,
                    })
                    .collect(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&document)
        .map_err(|e| ActivityError::Serialization(format!("failed to marshal JSON: {}", e)))
}
