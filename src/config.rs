//! Configuration for the tracker connection and the report query.
//!
//! Settings arrive as flat string key/value pairs (`jira.url`,
//! `jira.query.max_results`, ...), either from a host-provided map or from
//! environment variables. The API token is read preferentially from
//! `JIRA_API_TOKEN`.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::sync::Arc;

use crate::data_sources::JiraClient;
use crate::error::{ActivityError, Result};
use crate::format::ReportFormat;
use crate::model::QueryOptions;
use crate::repository::JiraRepository;
use crate::service::ActivityService;

/// Environment variable holding the API token.
pub const TOKEN_ENV_VAR: &str = "JIRA_API_TOKEN";

/// Default report window when the caller gives no start.
pub const DEFAULT_LOOKBACK_HOURS: u32 = 24;

pub const USERNAME_KEY: &str = "jira.username";
pub const TOKEN_KEY: &str = "jira.token";
pub const URL_KEY: &str = "jira.url";
pub const PROJECT_KEY: &str = "jira.project";
pub const FORMAT_KEY: &str = "jira.format";
pub const LOOKBACK_HOURS_KEY: &str = "jira.lookback_hours";
pub const JQL_TEMPLATE_KEY: &str = "jira.query.jql_template";
pub const ASSIGNEE_CURRENT_USER_KEY: &str = "jira.query.assignee_current_user";
pub const STATUS_FILTER_KEY: &str = "jira.query.status_filter";
pub const IN_OPEN_SPRINTS_KEY: &str = "jira.query.in_open_sprints";
pub const MAX_RESULTS_KEY: &str = "jira.query.max_results";
pub const FIELDS_KEY: &str = "jira.query.fields";

/// Setting keys and the environment variables they are read from.
const ENV_VARS: [(&str, &str); 11] = [
    (USERNAME_KEY, "JIRA_USERNAME"),
    (URL_KEY, "JIRA_URL"),
    (PROJECT_KEY, "JIRA_PROJECT"),
    (FORMAT_KEY, "JIRA_FORMAT"),
    (LOOKBACK_HOURS_KEY, "JIRA_LOOKBACK_HOURS"),
    (JQL_TEMPLATE_KEY, "JIRA_JQL_TEMPLATE"),
    (ASSIGNEE_CURRENT_USER_KEY, "JIRA_ASSIGNEE_CURRENT_USER"),
    (STATUS_FILTER_KEY, "JIRA_STATUS_FILTER"),
    (IN_OPEN_SPRINTS_KEY, "JIRA_IN_OPEN_SPRINTS"),
    (MAX_RESULTS_KEY, "JIRA_MAX_RESULTS"),
    (FIELDS_KEY, "JIRA_FIELDS"),
];

/// Everything needed to build an [`ActivityService`] and pick a formatter.
#[derive(Clone)]
pub struct TrackerConfig {
    pub username: String,
    pub token: String,
    pub url: String,
    pub project: String,
    pub format: ReportFormat,
    pub lookback_hours: u32,
    pub query: QueryOptions,
}

impl fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .field("url", &self.url)
            .field("project", &self.project)
            .field("format", &self.format)
            .field("lookback_hours", &self.lookback_hours)
            .field("query", &self.query)
            .finish()
    }
}

impl TrackerConfig {
    /// Build a config from host settings.
    ///
    /// `env_token`, when non-empty, takes precedence over `jira.token`.
    /// Optional keys that are absent, empty or unparseable keep their
    /// defaults.
    pub fn from_settings(settings: &HashMap<String, String>, env_token: Option<String>) -> Result<Self> {
        let get = |key: &str| settings.get(key).map(|v| v.as_str()).filter(|v| !v.is_empty());
        let required = |key: &'static str| {
            get(key)
                .map(|v| v.to_string())
                .ok_or(ActivityError::MissingSetting(key))
        };

        let token = match env_token.filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => required(TOKEN_KEY)?,
        };
        let project = required(PROJECT_KEY)?;

        let mut query = QueryOptions::default();
        if let Some(template) = get(JQL_TEMPLATE_KEY) {
            query.filter_template = template.to_string();
        }
        if let Some(flag) = get(ASSIGNEE_CURRENT_USER_KEY) {
            query.assignee_is_current_user = flag == "true";
        }
        if let Some(filter) = get(STATUS_FILTER_KEY) {
            query.status_filter = filter.to_string();
        }
        if let Some(flag) = get(IN_OPEN_SPRINTS_KEY) {
            query.in_open_sprints_only = flag == "true";
        }
        if let Some(max) = get(MAX_RESULTS_KEY).and_then(|v| v.trim().parse::<u32>().ok()) {
            if max > 0 {
                query.max_results = max;
            }
        }
        if let Some(fields) = get(FIELDS_KEY) {
            query.fields = parse_fields(fields);
        }
        if query.project.is_empty() {
            query.project = project.clone();
        }

        let lookback_hours = get(LOOKBACK_HOURS_KEY)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(DEFAULT_LOOKBACK_HOURS);

        Ok(Self {
            username: required(USERNAME_KEY)?,
            token,
            url: required(URL_KEY)?,
            project,
            format: ReportFormat::from_setting(get(FORMAT_KEY)),
            lookback_hours,
            query,
        })
    }

    /// Build a config from `JIRA_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let settings: HashMap<String, String> = ENV_VARS
            .iter()
            .filter_map(|(key, var)| env::var(var).ok().map(|value| (key.to_string(), value)))
            .collect();

        Self::from_settings(&settings, env::var(TOKEN_ENV_VAR).ok())
    }

    /// Wire the tracker client, repository and service for this config.
    pub fn build_service(&self) -> Result<ActivityService> {
        let client = JiraClient::new(&self.url, &self.username, &self.token)?;
        let repository = JiraRepository::new(client, self.query.clone());
        Ok(ActivityService::new(Arc::new(repository)))
    }
}

/// Split a comma-separated field list, trimming each entry.
fn parse_fields(raw: &str) -> Vec<String> {
    raw.split(',').map(|f| f.trim().to_string()).collect()
}
