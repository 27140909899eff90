//! Report formatters.
//!
//! The set of output formats is closed, so dispatch is a plain `match` on
//! [`ReportFormat`]. Every formatter is a pure function of the report and
//! returns a fixed placeholder when the report has no issues.
//!
//! - [`xml`]: structured markup (`application/xml`)
//! - [`json`]: structured data (`application/json`)
//! - [`markdown`]: human-readable text (`text/markdown`)
//! - [`html`]: styled, self-contained document (`text/html`)

pub mod html;
pub mod json;
pub mod markdown;
pub mod xml;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{ActivityReport, Issue};

/// Title shared by the text formats.
pub(crate) const REPORT_TITLE: &str = "Jira Activity Report";

/// Sentence used by the text formats for an empty report.
pub(crate) const NO_ACTIVITY: &str = "No activity found for the specified time range.";

/// A rendered report with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedContent {
    pub content_type: &'static str,
    pub content: String,
}

/// Output format selected by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Xml,
    #[default]
    Json,
    Markdown,
    Html,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 4] = [
        ReportFormat::Xml,
        ReportFormat::Json,
        ReportFormat::Markdown,
        ReportFormat::Html,
    ];

    /// Parse a format name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(name))
    }

    /// Resolve a configured format name. Unknown or absent names fall back
    /// to JSON.
    pub fn from_setting(name: Option<&str>) -> Self {
        name.and_then(Self::parse).unwrap_or_default()
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReportFormat::Xml => "xml",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Html => "html",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Xml => xml::CONTENT_TYPE,
            ReportFormat::Json => json::CONTENT_TYPE,
            ReportFormat::Markdown => markdown::CONTENT_TYPE,
            ReportFormat::Html => html::CONTENT_TYPE,
        }
    }

    /// Render `report`. Only the structured encoders can fail.
    pub fn format(&self, report: &ActivityReport) -> Result<FormattedContent> {
        let content = match self {
            ReportFormat::Xml => xml::render(report)?,
            ReportFormat::Json => json::render(report)?,
            ReportFormat::Markdown => markdown::render(report),
            ReportFormat::Html => html::render(report),
        };

        Ok(FormattedContent {
            content_type: self.content_type(),
            content,
        })
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Group issues by status for the text formats.
///
/// Groups are keyed by status name in lexicographic order so that output is
/// deterministic; issues keep report order within a group.
pub(crate) fn group_by_status(issues: &[Issue]) -> BTreeMap<&str, Vec<&Issue>> {
    let mut groups: BTreeMap<&str, Vec<&Issue>> = BTreeMap::new();
    for issue in issues {
        groups.entry(issue.status.as_str()).or_default().push(issue);
    }
    groups
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::model::{ActivityReport, Change, Comment, Issue, TimeRange, User};

    pub fn window() -> TimeRange {
        TimeRange::new(
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap(),
        )
    }

    pub fn user() -> User {
        User {
            account_id: "user123".to_string(),
            display_name: "Test User".to_string(),
            email: "test@example.com".to_string(),
        }
    }

    pub fn empty_report() -> ActivityReport {
        ActivityReport {
            time_range: window(),
            user: user(),
            issues: vec![],
        }
    }

    pub fn issue(key: &str, status: &str) -> Issue {
        Issue {
            key: key.to_string(),
            summary: "Test Issue".to_string(),
            status: status.to_string(),
            comments: vec![Comment {
                timestamp: Utc.with_ymd_and_hms(2023, 1, 1, 14, 0, 0).unwrap(),
                author: "Test User".to_string(),
                content: "This is a test comment".to_string(),
            }],
            changes: vec![Change {
                timestamp: Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap(),
                author: "Test User".to_string(),
                field: "status".to_string(),
                from_value: "Open".to_string(),
                to_value: "In Progress".to_string(),
            }],
        }
    }

    pub fn report() -> ActivityReport {
        ActivityReport {
            issues: vec![issue("JIRA-123", "In Progress")],
            ..empty_report()
        }
    }

    pub fn multi_status_report() -> ActivityReport {
        ActivityReport {
            issues: vec![
                issue("JIRA-1", "In Progress"),
                issue("JIRA-2", "Done"),
                issue("JIRA-3", "In Progress"),
                issue("JIRA-4", "To Do"),
            ],
            ..empty_report()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_from_setting() {
        assert_eq!(ReportFormat::from_setting(Some("xml")), ReportFormat::Xml);
        assert_eq!(ReportFormat::from_setting(Some("markdown")), ReportFormat::Markdown);
        assert_eq!(ReportFormat::from_setting(Some("HTML")), ReportFormat::Html);
        assert_eq!(ReportFormat::from_setting(Some("json")), ReportFormat::Json);
    }

    #[test]
    fn test_from_setting_defaults_to_json() {
        assert_eq!(ReportFormat::from_setting(None), ReportFormat::Json);
        assert_eq!(ReportFormat::from_setting(Some("")), ReportFormat::Json);
        assert_eq!(ReportFormat::from_setting(Some("yaml")), ReportFormat::Json);
        assert_eq!(ReportFormat::default(), ReportFormat::Json);
    }

    #[test]
    fn test_parse_names() {
        for format in ReportFormat::ALL {
            assert_eq!(ReportFormat::parse(format.name()), Some(format));
        }
        assert_eq!(ReportFormat::parse("pdf"), None);
    }

    #[test]
    fn test_content_types() {
        let report = report();
        let expected = [
            (ReportFormat::Xml, "application/xml"),
            (ReportFormat::Json, "application/json"),
            (ReportFormat::Markdown, "text/markdown"),
            (ReportFormat::Html, "text/html"),
        ];

        for (format, content_type) in expected {
            let out = format.format(&report).unwrap();
            assert_eq!(out.content_type, content_type, "format {}", format);
            assert!(out.content.contains("JIRA-123"), "format {}", format);
        }
    }

    #[test]
    fn test_empty_placeholders_are_deterministic() {
        for format in ReportFormat::ALL {
            let first = format.format(&empty_report()).unwrap();
            let second = format.format(&empty_report()).unwrap();
            assert_eq!(first, second, "format {}", format);
            assert_eq!(first.content_type, format.content_type());
        }
    }

    #[test]
    fn test_rendering_is_pure() {
        let report = multi_status_report();
        for format in ReportFormat::ALL {
            let first = format.format(&report).unwrap();
            let second = format.format(&report).unwrap();
            assert_eq!(first, second, "format {}", format);
        }
    }

    #[test]
    fn test_group_by_status() {
        let report = multi_status_report();

        let groups = group_by_status(&report.issues);

        let statuses: Vec<_> = groups.keys().copied().collect();
        assert_eq!(statuses, vec!["Done", "In Progress", "To Do"]);
        let in_progress: Vec<_> = groups["In Progress"].iter().map(|i| i.key.as_str()).collect();
        assert_eq!(in_progress, vec!["JIRA-1", "JIRA-3"]);
    }
}
