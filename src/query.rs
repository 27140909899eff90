//! Builds tracker filter queries (JQL) from [`QueryOptions`].
//!
//! User-supplied fragments are not validated here; a malformed filter only
//! fails once the tracker executes the search.

use crate::model::QueryOptions;

/// Placeholder token in the filter template.
const PLACEHOLDER: &str = "%s";

/// Both spellings accepted for "every status except Closed".
const NOT_CLOSED_SHORTHANDS: [&str; 2] = ["!Closed", "!= Closed"];

/// Build the search query for the window `[from, to)`.
///
/// Clauses are joined with `AND` in a fixed order: the filled template, the
/// assignee clause, the status clause, then the open-sprints clause.
pub fn build_query(options: &QueryOptions, from: &str, to: &str) -> String {
    let mut conditions = vec![fill_template(
        &options.filter_template,
        [&options.project, from, to],
    )];

    if options.assignee_is_current_user {
        conditions.push("assignee = currentUser()".to_string());
    }

    if !options.status_filter.is_empty() {
        conditions.push(status_clause(&options.status_filter));
    }

    if options.in_open_sprints_only {
        conditions.push("sprint IN openSprints()".to_string());
    }

    conditions.join(" AND ")
}

fn status_clause(filter: &str) -> String {
    if NOT_CLOSED_SHORTHANDS.contains(&filter) {
        "status != Closed".to_string()
    } else {
        format!("status {}", filter)
    }
}

/// Substitute `values` into the placeholders positionally.
///
/// Surplus placeholders are left as-is; surplus values are ignored.
fn fill_template(template: &str, values: [&str; 3]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut values = values.into_iter();
    let mut rest = template;

    while let Some(pos) = rest.find(PLACEHOLDER) {
        filled.push_str(&rest[..pos]);
        filled.push_str(values.next().unwrap_or(PLACEHOLDER));
        rest = &rest[pos + PLACEHOLDER.len()..];
    }
    filled.push_str(rest);

    filled
}
