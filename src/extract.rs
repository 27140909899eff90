//! Activity extraction: raw tracker issues into window-filtered domain issues.
//!
//! Timestamps that do not match the tracker's fixed layout are dropped
//! without error. Every list is processed through [`fan_out`]: a large issue
//! batch is spread over worker threads, and each issue's comments and
//! histories then run inline on that worker. Comments and changes are
//! stable-sorted by timestamp, so ties keep tracker order.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::aggregation::fan_out;
use crate::data_sources::jira::{JiraComment, JiraHistory, JiraIssue};
use crate::model::{Change, Comment, Issue, TimeRange};

/// Layout of tracker timestamps, e.g. `2023-01-01T12:00:00.000+0000`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Parse a tracker timestamp, normalized to UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            debug!(timestamp = %raw, error = %e, "Dropping item with unparseable timestamp");
            None
        }
    }
}

/// Comments created inside `window`, regardless of author.
pub fn extract_comments(comments: &[JiraComment], window: &TimeRange) -> Vec<Comment> {
    let mut result: Vec<Comment> = fan_out(comments, |comment| {
        let created = parse_timestamp(&comment.created)?;
        window.contains(created).then(|| Comment {
            timestamp: created,
            author: comment.author.display_name.clone(),
            content: comment.body.clone(),
        })
    });

    result.sort_by_key(|c| c.timestamp);
    result
}

/// Field changes made inside `window` by the actor `actor_account_id`.
///
/// Each item of a qualifying history entry becomes one [`Change`] sharing the
/// entry's timestamp and author.
pub fn extract_changes(
    histories: &[JiraHistory],
    window: &TimeRange,
    actor_account_id: &str,
) -> Vec<Change> {
    let mut result: Vec<Change> = fan_out(histories, |history| {
        let Some(created) = parse_timestamp(&history.created) else {
            return Vec::new();
        };
        if !window.contains(created) || history.author.account_id != actor_account_id {
            return Vec::new();
        }

        history
            .items
            .iter()
            .map(|item| Change {
                timestamp: created,
                author: history.author.display_name.clone(),
                field: item.field.clone(),
                from_value: item.from_text.clone().unwrap_or_default(),
                to_value: item.to_text.clone().unwrap_or_default(),
            })
            .collect()
    });

    // Stable: items of one history entry keep their relative order.
    result.sort_by_key(|c| c.timestamp);
    result
}

/// Normalize one raw issue.
///
/// The issue is kept even when none of its activity falls inside `window`.
pub fn extract_issue(raw: &JiraIssue, window: &TimeRange, actor_account_id: &str) -> Issue {
    Issue {
        key: raw.key.clone(),
        summary: raw.fields.summary.clone(),
        status: raw.status_name().to_string(),
        comments: extract_comments(raw.comments(), window),
        changes: extract_changes(raw.histories(), window, actor_account_id),
    }
}

/// Normalize a search result, preserving the tracker's result order.
pub fn extract_issues(raw: &[JiraIssue], window: &TimeRange, actor_account_id: &str) -> Vec<Issue> {
    fan_out(raw, |issue| Some(extract_issue(issue, window, actor_account_id)))
}
