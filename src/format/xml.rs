//! Structured-markup (XML) formatter.

use quick_xml::se::Serializer;
use serde::Serialize;

use crate::error::{ActivityError, Result};
use crate::model::ActivityReport;

pub const CONTENT_TYPE: &str = "application/xml";

/// XML declaration prepended to non-empty documents.
pub const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Exact output for a report without issues.
pub const EMPTY: &str = "<jira_report></jira_report>";

/// Timestamp layout inside the document.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize)]
#[serde(rename = "jira_report")]
struct XmlReport<'a> {
    #[serde(rename = "issue")]
    issues: Vec<XmlIssue<'a>>,
}

#[derive(Serialize)]
struct XmlIssue<'a> {
    key: &'a str,
    status: &'a str,
    summary: &'a str,
    comments: XmlComments<'a>,
    changelog: XmlChangelog<'a>,
}

#[derive(Serialize)]
struct XmlComments<'a> {
    #[serde(rename = "comment")]
    comments: Vec<XmlComment<'a>>,
}

#[derive(Serialize)]
struct XmlComment<'a> {
    timestamp: String,
    author: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct XmlChangelog<'a> {
    #[serde(rename = "change")]
    changes: Vec<XmlChange<'a>>,
}

#[derive(Serialize)]
struct XmlChange<'a> {
    timestamp: String,
    author: &'a str,
    field: &'a str,
    from: &'a str,
    to: &'a str,
}

/// Render `report` as an indented XML document.
///
/// Text content is escaped by the serializer; nothing else is altered.
pub fn render(report: &ActivityReport) -> Result<String> {
    if report.issues.is_empty() {
        return Ok(EMPTY.to_string());
    }

    let document = XmlReport {
        issues: report
            .issues
            .iter()
            .map(|issue| XmlIssue {
                key: &issue.key,
                status: &issue.status,
                summary: &issue.summary,
                comments: XmlComments {
                    comments: issue
                        .comments
                        .iter()
                        .map(|c| XmlComment {
                            timestamp: c.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                            author: &c.author,
                            content: &c.content,
                        })
                        .collect(),
                },
                changelog: XmlChangelog {
                    changes: issue
                        .changes
                        .iter()
                        .map(|c| XmlChange {
                            timestamp: c.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                            author: &c.author,
                            field: &c.field,
                            from: &c.from_value,
                            to: &c.to_value,
                        })
                        .collect(),
                },
            })
            .collect(),
    };

    let mut body = String::new();
    let mut serializer = Serializer::new(&mut body);
    serializer.indent(' ', 2);
    document
        .serialize(serializer)
        .map_err(|e| ActivityError::Serialization(format!("failed to marshal XML: {}", e)))?;

    Ok(format!("{}{}", HEADER, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures::*;

    #[test]
    fn test_empty_report_is_empty_root() {
        assert_eq!(render(&empty_report()).unwrap(), "<jira_report></jira_report>");
    }

    #[test]
    fn test_document_structure() {
        let content = render(&report()).unwrap();

        assert!(content.starts_with(HEADER));
        assert!(content.contains("<jira_report>"));
        assert!(content.contains("<issue>"));
        assert!(content.contains("<key>JIRA-123</key>"));
        assert!(content.contains("<status>In Progress</status>"));
        assert!(content.contains("<summary>Test Issue</summary>"));
        assert!(content.contains("<timestamp>2023-01-01 14:00:00</timestamp>"));
        assert!(content.contains("<content>This is a test comment</content>"));
        assert!(content.contains("<from>Open</from>"));
        assert!(content.contains("<to>In Progress</to>"));
        assert!(content.trim_end().ends_with("</jira_report>"));
    }

    #[test]
    fn test_one_element_per_issue() {
        let content = render(&multi_status_report()).unwrap();
        assert_eq!(content.matches("<issue>").count(), 4);
        assert_eq!(content.matches("<comment>").count(), 4);
        assert_eq!(content.matches("<change>").count(), 4);
    }

    #[test]
    fn test_text_is_escaped() {
        let mut report = report();
        report.issues[0].summary = "Fix <b> & </b>".to_string();

        let content = render(&report).unwrap();

        assert!(content.contains("Fix &lt;b"));
        assert!(content.contains("&amp;"));
        assert!(!content.contains("<b>"));
    }
}
