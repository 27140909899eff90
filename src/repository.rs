//! Repository boundary between the activity service and the tracker.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::data_sources::{JiraClient, SearchOptions};
use crate::error::{ActivityError, GET_USER_CONTEXT, Result, SEARCH_CONTEXT};
use crate::extract::extract_issues;
use crate::model::{Issue, QueryOptions, TimeRange, User};
use crate::query::build_query;

/// Format of the window bounds inside the search query.
const QUERY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Read access to the tracker data an activity report needs.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// The user the tracker credentials belong to.
    async fn get_user(&self) -> Result<User>;

    /// Issues touched inside `window`, with comments and changes already
    /// filtered to the window (and changes to `actor_account_id`).
    async fn get_issues(&self, window: &TimeRange, actor_account_id: &str) -> Result<Vec<Issue>>;
}

/// [`ActivityRepository`] backed by the Jira REST API.
#[derive(Debug, Clone)]
pub struct JiraRepository {
    client: JiraClient,
    options: QueryOptions,
}

impl JiraRepository {
    pub fn new(client: JiraClient, options: QueryOptions) -> Self {
        Self { client, options }
    }

    /// Search query for `window`.
    pub fn query_for(&self, window: &TimeRange) -> String {
        build_query(
            &self.options,
            &window.start.format(QUERY_TIME_FORMAT).to_string(),
            &window.end.format(QUERY_TIME_FORMAT).to_string(),
        )
    }

    fn search_options(&self) -> SearchOptions {
        SearchOptions {
            max_results: self.options.max_results,
            fields: self.options.fields.clone(),
            expand: self.options.expand_history.then(|| "changelog".to_string()),
        }
    }
}

#[async_trait]
impl ActivityRepository for JiraRepository {
    async fn get_user(&self) -> Result<User> {
        let user = self.client.get_myself().await.map_err(|e| {
            warn!(error = %e, "Failed to get current user");
            ActivityError::tracker(GET_USER_CONTEXT, e)
        })?;

        Ok(User {
            account_id: user.account_id,
            display_name: user.display_name,
            email: user.email_address,
        })
    }

    async fn get_issues(&self, window: &TimeRange, actor_account_id: &str) -> Result<Vec<Issue>> {
        let jql = self.query_for(window);
        debug!(jql = %jql, "Searching issues");

        let response = self
            .client
            .search(&jql, &self.search_options())
            .await
            .map_err(|e| {
                warn!(error = %e, "Issue search failed");
                ActivityError::tracker(SEARCH_CONTEXT, e)
            })?;

        let total = response.total;
        let returned = response.issues.len();
        if total > returned as u64 {
            warn!(
                total,
                returned,
                max_results = self.options.max_results,
                "Search results truncated"
            );
        }

        let window = *window;
        let actor = actor_account_id.to_string();
        let raw = response.issues;
        let issues = tokio::task::spawn_blocking(move || extract_issues(&raw, &window, &actor))
            .await
            .map_err(|e| {
                warn!(error = %e, "Issue extraction task failed");
                ActivityError::Extraction(e.to_string())
            })?;

        info!(
            total,
            issue_count = issues.len(),
            active_count = issues.iter().filter(|i| i.has_activity()).count(),
            "Issues fetched"
        );

        Ok(issues)
    }
}
