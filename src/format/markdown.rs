//! Human-readable (Markdown) formatter.

use crate::format::{NO_ACTIVITY, REPORT_TITLE, group_by_status};
use crate::model::{ActivityReport, Issue};

pub const CONTENT_TYPE: &str = "text/markdown";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render `report` as Markdown, one section per status.
pub fn render(report: &ActivityReport) -> String {
    if report.issues.is_empty() {
        return NO_ACTIVITY.to_string();
    }

    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", REPORT_TITLE));
    out.push_str(&format!(
        "**Time Range:** {} to {}\n\n",
        report.time_range.start.format(DATE_FORMAT),
        report.time_range.end.format(DATE_FORMAT)
    ));
    out.push_str(&format!(
        "**User:** {} ({})\n\n",
        report.user.display_name, report.user.email
    ));

    for (status, issues) in group_by_status(&report.issues) {
        out.push_str(&format!("## {} Issues\n\n", status));
        for issue in issues {
            render_issue(&mut out, issue);
        }
    }

    out
}

fn render_issue(out: &mut String, issue: &Issue) {
    out.push_str(&format!("### [{}] {}\n\n", issue.key, issue.summary));

    if !issue.changes.is_empty() {
        out.push_str("#### Changes\n\n");
        out.push_str("| Time | Field | From | To |\n");
        out.push_str("|------|-------|------|----|\n");
        for change in &issue.changes {
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                change.timestamp.format(TIMESTAMP_FORMAT),
                table_cell(&change.field),
                table_cell(&change.from_value),
                table_cell(&change.to_value)
            ));
        }
        out.push('\n');
    }

    if !issue.comments.is_empty() {
        out.push_str("#### Comments\n\n");
        for comment in &issue.comments {
            out.push_str(&format!(
                "**{}** - {}\n\n",
                comment.author,
                comment.timestamp.format(TIMESTAMP_FORMAT)
            ));
            out.push_str(&format!("{}\n\n", comment.content));
        }
    }

    out.push_str("---\n\n");
}

/// Keep a value on one table row.
fn table_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}
