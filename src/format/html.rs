//! Styled document (HTML) formatter.
//!
//! Same content as the Markdown report, wrapped in a self-contained page with
//! an embedded stylesheet. Report text is entity-escaped.

use crate::format::{NO_ACTIVITY, REPORT_TITLE, group_by_status};
use crate::model::{ActivityReport, Issue};

pub const CONTENT_TYPE: &str = "text/html";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const STYLESHEET: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; }
h1 { color: #0052CC; }
h2 { color: #172B4D; border-bottom: 1px solid #DFE1E6; padding-bottom: 8px; }
h3 { margin-top: 20px; }
.issue { background-color: #F4F5F7; border-radius: 3px; padding: 15px; margin-bottom: 15px; }
.issue-key { color: #0052CC; font-weight: bold; }
.issue-summary { font-size: 16px; margin-bottom: 10px; }
.metadata { color: #6B778C; font-size: 14px; margin-bottom: 15px; }
.changes, .comments { margin-top: 10px; }
.change, .comment { background-color: white; border: 1px solid #DFE1E6; padding: 10px; margin-bottom: 8px; }
.author { color: #0052CC; font-weight: bold; }
.timestamp { color: #6B778C; font-size: 12px; }
";

/// Page returned for a report without issues.
pub fn empty_document() -> String {
    format!(
        "<html><body><h1>{}</h1><p>{}</p></body></html>",
        REPORT_TITLE, NO_ACTIVITY
    )
}

/// Render `report` as a complete HTML page.
pub fn render(report: &ActivityReport) -> String {
    if report.issues.is_empty() {
        return empty_document();
    }

    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", REPORT_TITLE));
    out.push_str(&format!("<style>\n{}</style>\n", STYLESHEET));
    out.push_str("</head>\n<body>\n");

    out.push_str(&format!("<h1>{}</h1>\n", REPORT_TITLE));
    out.push_str("<div class=\"metadata\">\n");
    out.push_str(&format!(
        "<p><strong>Time Range:</strong> {} to {}</p>\n",
        report.time_range.start.format(DATE_FORMAT),
        report.time_range.end.format(DATE_FORMAT)
    ));
    out.push_str(&format!(
        "<p><strong>User:</strong> {} ({})</p>\n",
        escape(&report.user.display_name),
        escape(&report.user.email)
    ));
    out.push_str("</div>\n");

    for (status, issues) in group_by_status(&report.issues) {
        out.push_str(&format!("<h2>{} Issues</h2>\n", escape(status)));
        for issue in issues {
            render_issue(&mut out, issue);
        }
    }

    out.push_str("</body>\n</html>");
    out
}

fn render_issue(out: &mut String, issue: &Issue) {
    out.push_str("<div class=\"issue\">\n");
    out.push_str(&format!(
        "<h3><span class=\"issue-key\">[{}]</span> <span class=\"issue-summary\">{}</span></h3>\n",
        escape(&issue.key),
        escape(&issue.summary)
    ));

    if !issue.changes.is_empty() {
        out.push_str("<div class=\"changes\">\n<h4>Changes</h4>\n");
        for change in &issue.changes {
            out.push_str("<div class=\"change\">\n");
            out.push_str(&format!(
                "<p><span class=\"author\">{}</span> changed <strong>{}</strong> from \"{}\" to \"{}\"</p>\n",
                escape(&change.author),
                escape(&change.field),
                escape(&change.from_value),
                escape(&change.to_value)
            ));
            out.push_str(&format!(
                "<p class=\"timestamp\">{}</p>\n",
                change.timestamp.format(TIMESTAMP_FORMAT)
            ));
            out.push_str("</div>\n");
        }
        out.push_str("</div>\n");
    }

    if !issue.comments.is_empty() {
        out.push_str("<div class=\"comments\">\n<h4>Comments</h4>\n");
        for comment in &issue.comments {
            out.push_str("<div class=\"comment\">\n");
            out.push_str(&format!(
                "<p><span class=\"author\">{}</span></p>\n",
                escape(&comment.author)
            ));
            out.push_str(&format!("<p>{}</p>\n", escape(&comment.content)));
            out.push_str(&format!(
                "<p class=\"timestamp\">{}</p>\n",
                comment.timestamp.format(TIMESTAMP_FORMAT)
            ));
            out.push_str("</div>\n");
        }
        out.push_str("</div>\n");
    }

    out.push_str("</div>\n");
}

/// Escape text for element content and double-quoted attributes.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
